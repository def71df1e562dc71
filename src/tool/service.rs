//! Tool variant orchestration: profiles, arming, and the status screen.

use core::fmt::Write as _;

use log::{info, warn};

use crate::error::StoreError;
use crate::events::{Key, Press};
use crate::app::ports::{DialogPort, FrameTxPort, StorePort, ToolIoPort};
use crate::tool::cf10b;
use crate::tool::engine::Engine;
use crate::tool::profile::{GpioProfile, MODELS};
use crate::ui::{RowModel, ScreenModel, yes_no};

/// One profile per selectable model, persisted independently.
pub struct ToolService {
    profiles: [GpioProfile; MODELS.len()],
    active: usize,
    engine: Engine,
}

impl ToolService {
    /// Load persisted profiles over the built-in presets and bring up the
    /// pins for the first model, disarmed.
    pub fn new(store: &impl StorePort, now_ms: u32, io: &mut impl ToolIoPort) -> Self {
        let mut profiles = [
            GpioProfile::preset(MODELS[0]),
            GpioProfile::preset(MODELS[1]),
            GpioProfile::preset(MODELS[2]),
        ];
        for profile in &mut profiles {
            match store.load_profile(profile.model.name(), profile) {
                Ok(()) => info!("loaded profile {}", profile.model.name()),
                Err(StoreError::NotFound) => {}
                Err(e) => warn!("profile {}: {e}, using preset", profile.model.name()),
            }
        }
        let engine = Engine::new(&profiles[0], now_ms, io);
        Self { profiles, active: 0, engine }
    }

    pub fn active_profile(&self) -> &GpioProfile {
        &self.profiles[self.active]
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Engine cadence tick.
    pub fn on_tick(&mut self, now_ms: u32, io: &mut impl ToolIoPort) {
        self.engine.tick(&self.profiles[self.active], now_ms, io);
    }

    /// Key dispatch for the tool screen.  The global exit chord is consumed
    /// by the control loop before this point.
    pub fn handle_key(
        &mut self,
        key: Key,
        press: Press,
        now_ms: u32,
        io: &mut impl ToolIoPort,
        dialog: &mut impl DialogPort,
        tx: &mut impl FrameTxPort,
    ) {
        match (key, press) {
            (Key::Up, Press::Short | Press::Repeat) => self.cycle(now_ms, io, MODELS.len() - 1),
            (Key::Down, Press::Short | Press::Repeat) => self.cycle(now_ms, io, 1),
            (Key::Ok, Press::Short) => {
                let arm = !self.engine.is_armed();
                if arm
                    && !dialog.confirm(
                        "Arm output?",
                        "The configured pin will start switching.",
                    )
                {
                    return;
                }
                self.engine.set_armed(arm, &self.profiles[self.active], io);
            }
            (Key::Ok, Press::Long) => {
                if self.engine.send_set_speed(&self.profiles[self.active], tx) {
                    info!("set-speed frame sent");
                }
            }
            _ => {}
        }
    }

    fn cycle(&mut self, now_ms: u32, io: &mut impl ToolIoPort, step: usize) {
        self.active = (self.active + step) % MODELS.len();
        self.engine.change_profile(&self.profiles[self.active], now_ms, io);
    }

    /// Persist the active profile.
    pub fn save_active(&self, store: &mut impl StorePort) -> Result<(), StoreError> {
        let profile = &self.profiles[self.active];
        store.save_profile(profile.model.name(), profile)
    }

    /// Status frame: model, armed state, interlock, frequency and the
    /// equivalent compressor speed.
    pub fn render(&self) -> ScreenModel {
        let profile = self.active_profile();
        let mut model = ScreenModel::default();
        let _ = model.title.push_str("CF10B tool");

        let mut name = heapless::String::new();
        let _ = name.push_str(profile.model.name());
        let mut freq = heapless::String::new();
        let _ = write!(freq, "{} Hz", profile.freq_hz);
        let mut speed = heapless::String::new();
        let _ = write!(speed, "{} RPM", cf10b::rpm_for_freq(profile.freq_hz));
        let mut interlock = heapless::String::new();
        let _ = interlock.push_str(if self.engine.interlock_blocked(profile) {
            "BLOCKED"
        } else {
            "clear"
        });

        let rows = [
            RowModel { value: Some(name), selected: true, ..RowModel::plain("Model") },
            RowModel { value: Some(yes_no(self.engine.is_armed())), ..RowModel::plain("Armed") },
            RowModel { value: Some(interlock), ..RowModel::plain("Interlock") },
            RowModel { value: Some(freq), ..RowModel::plain("Frequency") },
            RowModel { value: Some(speed), ..RowModel::plain("Speed") },
        ];
        for row in rows {
            let _ = model.rows.push(row);
        }
        model
    }
}
