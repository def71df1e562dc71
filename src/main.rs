//! Inverter starter firmware — main entry point.
//!
//! Hexagonal architecture with event-driven execution:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter   LogDisplay    LogDialog    FsStore    │
//! │  (Actuator+ToolIo) (DisplayPort) (DialogPort) (Store)    │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ───────────────      │
//! │                                                          │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │            AppService (pure logic)               │    │
//! │  │  Power/Safety · Runtime limit · Navigation       │    │
//! │  └──────────────────────────────────────────────────┘    │
//! │                                                          │
//! │  Keypad ISRs + esp_timers ──▶ lock-free event queue      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use invstarter::adapters::dialog::LogDialog;
use invstarter::adapters::display_log::LogDisplay;
use invstarter::adapters::hardware::{HardwareAdapter, LogFrameTx};
use invstarter::adapters::log_sink::LogEventSink;
use invstarter::adapters::store::FsStore;
use invstarter::adapters::time::Uptime;
use invstarter::app::events::AppEvent;
use invstarter::app::ports::{EventSink, StorePort, TimerId, TimerPort};
use invstarter::app::service::{AppService, LoopFlow};
use invstarter::config::{AppVariant, SystemConfig};
use invstarter::drivers::hw_init;
use invstarter::drivers::hw_timer::EspTimers;
use invstarter::drivers::keypad::Keypad;
use invstarter::events::{self, Event};
use invstarter::pins;
use invstarter::tool::service::ToolService;

/// Backing directory for profiles and the config blob.
const STORE_DIR: &str = "/spiffs/invstarter";

/// Last-resort drive pin safety.  Drops on every exit path, including a
/// panic unwind, and forces the pin back to Hi-Z through the raw shims so
/// it never stays driven after the application is gone.
struct DrivePinGuard;

impl Drop for DrivePinGuard {
    fn drop(&mut self) {
        hw_init::pwm_stop();
        hw_init::drive_pin_hi_z();
        hw_init::gpio_write(pins::LED_GPIO, false);
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("invstarter v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        error!("HAL init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let _pin_guard = DrivePinGuard;
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {e} — continuing, keys are poll-only");
    }

    // ── 3. Configuration ──────────────────────────────────────
    let mut store = FsStore::new(STORE_DIR);
    let config = match store.load_config() {
        Ok(cfg) => {
            info!("config loaded");
            cfg
        }
        Err(e) => {
            warn!("config load failed ({e}), using defaults");
            SystemConfig::default()
        }
    };

    // ── 4. Adapters ───────────────────────────────────────────
    let clock = Uptime::new();
    let mut hw = HardwareAdapter::new();
    let mut timers = EspTimers::new()?;
    let mut display = LogDisplay::new();
    let mut dialog = LogDialog::new(false);
    let mut sink = LogEventSink::new();
    let mut keypad = Keypad::new();

    info!("system ready, entering event loop ({:?})", config.variant);

    match config.variant {
        AppVariant::Starter => run_starter(
            &config, &clock, &mut hw, &mut timers, &mut display, &mut dialog, &mut sink,
            &mut keypad,
        ),
        AppVariant::Cf10bTool => run_tool(
            &config, &clock, &mut store, &mut hw, &mut timers, &mut display, &mut dialog,
            &mut keypad,
        ),
    }

    // Config is written back so settings changed over RPC/console persist.
    if let Err(e) = store.save_config(&config) {
        warn!("config save failed: {e}");
    }
    info!("bye");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_starter(
    config: &SystemConfig,
    clock: &Uptime,
    hw: &mut HardwareAdapter,
    timers: &mut EspTimers,
    display: &mut LogDisplay,
    dialog: &mut LogDialog,
    sink: &mut LogEventSink,
    keypad: &mut Keypad,
) {
    let mut app = AppService::new(config.clone());
    sink.emit(&AppEvent::Started);
    app.render(display);

    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(config.poll_timeout_ms)));

        let now_ms = clock.now_ms();
        for (key, press) in keypad.poll(now_ms, hw_init::key_levels()) {
            events::push_event(Event::Key { key, press });
        }

        let mut exit = false;
        events::drain_events(|event| {
            if app.handle_event(event, hw, timers, dialog, sink) == LoopFlow::Exit {
                exit = true;
            }
        });
        app.render(display);
        if exit {
            break;
        }
    }

    app.shutdown(hw, timers, sink);
}

#[allow(clippy::too_many_arguments)]
fn run_tool(
    config: &SystemConfig,
    clock: &Uptime,
    store: &mut FsStore,
    hw: &mut HardwareAdapter,
    timers: &mut EspTimers,
    display: &mut LogDisplay,
    dialog: &mut LogDialog,
    keypad: &mut Keypad,
) {
    use invstarter::app::ports::DisplayPort;
    use invstarter::events::{Key, Press};

    let mut tool = ToolService::new(store, clock.now_ms(), hw);
    let mut tx = LogFrameTx;
    timers.start_periodic(TimerId::EngineTick, config.engine_tick_interval_ms);
    display.present(&tool.render());

    'outer: loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(config.poll_timeout_ms)));

        let now_ms = clock.now_ms();
        for (key, press) in keypad.poll(now_ms, hw_init::key_levels()) {
            events::push_event(Event::Key { key, press });
        }

        while let Some(event) = events::pop_event() {
            match event {
                Event::EngineTick => tool.on_tick(clock.now_ms(), hw),
                Event::Key { key: Key::Back, press: Press::Long } => break 'outer,
                Event::Key { key, press } => {
                    tool.handle_key(key, press, clock.now_ms(), hw, dialog, &mut tx);
                }
                _ => {}
            }
        }
        display.present(&tool.render());
    }

    timers.cancel_all();
    if let Err(e) = tool.save_active(store) {
        warn!("profile save failed: {e}");
    }
}
