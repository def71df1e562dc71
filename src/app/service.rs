//! The starter application service.
//!
//! Owns the domain state (power controller, runtime limiter, navigation)
//! and turns queue events into port calls.  This is the only place where
//! UI commands meet hardware.

use log::info;

use crate::app::commands::AppCommand;
use crate::app::events::{AppEvent, OffReason};
use crate::app::ports::{ActuatorPort, DialogPort, DisplayPort, EventSink, TimerId, TimerPort};
use crate::config::SystemConfig;
use crate::events::{Event, Key, Press};
use crate::modes::IDLE_MODE;
use crate::power::PowerController;
use crate::runtime_limit::RuntimeLimiter;
use crate::ui::{UiContext, UiState};

/// Outcome of one event dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopFlow {
    Continue,
    /// The exit chord fired; the caller runs shutdown and leaves the loop.
    Exit,
}

const CONFIRM_POWER_ON: (&str, &str) = (
    "Power on?",
    "Voltage will be applied to the drive wire. Check the wiring first.",
);
const CONFIRM_LIMIT_OFF: (&str, &str) = (
    "Disable run time limit?",
    "The compressor will keep running until stopped by hand.",
);

pub struct AppService {
    config: SystemConfig,
    ui: UiState,
    power: PowerController,
    limiter: RuntimeLimiter,
    led_on: bool,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        let ui = UiState::new(config.start_screen);
        let power = PowerController::new(config.settle_delay_ms);
        let limiter = RuntimeLimiter::new(config.limit_runtime);
        Self { config, ui, power, limiter, led_on: false }
    }

    pub fn power(&self) -> &PowerController {
        &self.power
    }

    pub fn limiter(&self) -> &RuntimeLimiter {
        &self.limiter
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    fn ctx(&self) -> UiContext {
        UiContext {
            powered: self.power.is_powered(),
            active_mode: self.power.active_mode(),
            limit_enabled: self.limiter.is_enabled(),
            countdown_secs: self.limiter.is_counting().then(|| self.limiter.remaining_secs()),
        }
    }

    /// Dispatch one queue event.
    pub fn handle_event(
        &mut self,
        event: Event,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
        dialog: &mut impl DialogPort,
        sink: &mut impl EventSink,
    ) -> LoopFlow {
        match event {
            Event::Key { key: Key::Back, press: Press::Long } => return LoopFlow::Exit,
            Event::Key { key, press } => {
                let commands = self.ui.handle_key(key, press, &self.ctx());
                for cmd in commands {
                    self.execute(cmd, hw, timers, dialog, sink);
                }
            }
            Event::RuntimeExpired => self.on_runtime_expired(hw, timers, sink),
            Event::RuntimeTick => self.limiter.on_second_tick(),
            Event::LedToggle => {
                self.led_on = !self.led_on;
                hw.led_set(self.led_on);
            }
            Event::HintTimeout => self.ui.clear_hint(),
            // Tool cadence; routed to the tool service by the control loop.
            Event::EngineTick => {}
        }
        LoopFlow::Continue
    }

    fn execute(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
        dialog: &mut impl DialogPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ApplyMode(idx) => self.apply_mode(idx, hw, timers, sink),
            AppCommand::RequestPowerOn => {
                if self.power.is_powered() {
                    return;
                }
                let (header, body) = CONFIRM_POWER_ON;
                if !dialog.confirm(header, body) {
                    info!("power on declined");
                    return;
                }
                self.power.power_on(hw);
                sink.emit(&AppEvent::PoweredOn);
            }
            AppCommand::PowerOff => {
                if !self.power.is_powered() {
                    return;
                }
                self.power.power_off(hw, timers);
                self.limiter.cancel(timers);
                sink.emit(&AppEvent::PoweredOff { reason: OffReason::UserRequest });
            }
            AppCommand::RequestLimitToggle => {
                if self.limiter.is_enabled() {
                    let (header, body) = CONFIRM_LIMIT_OFF;
                    if !dialog.confirm(header, body) {
                        return;
                    }
                    self.limiter.set_enabled(false);
                } else {
                    self.limiter.set_enabled(true);
                }
                self.limiter.rearm(self.power.active_mode(), timers);
                sink.emit(&AppEvent::LimitChanged { enabled: self.limiter.is_enabled() });
                if self.limiter.is_counting() {
                    sink.emit(&AppEvent::CountdownStarted { secs: self.limiter.remaining_secs() });
                }
            }
            AppCommand::SelectInverter(kind) => {
                sink.emit(&AppEvent::InverterSelected(kind));
            }
            AppCommand::ShowExitHint => {
                timers.start_oneshot(TimerId::Hint, self.config.hint_timeout_ms);
            }
        }
    }

    fn apply_mode(
        &mut self,
        idx: usize,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        if !self.power.apply_mode(idx, hw, timers) {
            return;
        }
        self.led_on = false;
        self.limiter.rearm(self.power.active_mode(), timers);
        if let Some(mode) = crate::modes::mode_at(idx) {
            sink.emit(&AppEvent::ModeApplied { index: idx, freq_hz: mode.freq_hz });
        }
        if self.limiter.is_counting() {
            sink.emit(&AppEvent::CountdownStarted { secs: self.limiter.remaining_secs() });
        }
    }

    /// The one-shot limit fired: drop to standby, still powered.
    fn on_runtime_expired(
        &mut self,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        // A stale event (already in standby, limit switched off meanwhile,
        // or powered off) is dropped.
        if !self.power.is_powered()
            || !self.limiter.is_enabled()
            || self.power.active_mode() == Some(IDLE_MODE)
        {
            return;
        }
        sink.emit(&AppEvent::CountdownExpired);
        self.apply_mode(IDLE_MODE, hw, timers, sink);
    }

    /// Draw the current screen.
    pub fn render(&self, display: &mut impl DisplayPort) {
        display.present(&self.ui.render(&self.ctx()));
    }

    /// Final teardown: cancel every timer and release the drive pin.  Safe
    /// to call in any state, including after a partial startup.
    pub fn shutdown(
        &mut self,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        timers.cancel_all();
        self.power.force_safe(hw, timers);
        sink.emit(&AppEvent::PoweredOff { reason: OffReason::Shutdown });
        sink.emit(&AppEvent::Exited);
    }
}
