//! Tool engine: periodic evaluation of the active profile.
//!
//! The engine runs on a fixed tick (nominally 20 ms).  Every tick it
//! debounces the interlock input, evaluates the interlock *before* any
//! model-specific behaviour, and only then lets the active model drive the
//! output.  A tripped interlock disarms the engine: the output stays off
//! until the user re-arms with the input released.

use log::info;

use crate::app::ports::{FrameTxPort, ToolIoPort};
use crate::tool::cf10b;
use crate::tool::profile::{GpioProfile, ModelKind};

/// Square-wave frequency bounds, Hz.  Values outside are clamped, not
/// rejected, so a hand-edited profile still produces a safe drive.
pub const FREQ_MIN_HZ: u32 = 66;
pub const FREQ_MAX_HZ: u32 = 150;

/// Runtime state of the tool engine.
pub struct Engine {
    armed: bool,
    out_on: bool,
    last_toggle_ms: u32,
    in_raw_last: bool,
    in_change_ms: u32,
    in_debounced: bool,
}

impl Engine {
    /// Bring up the pins for `profile` and start disarmed.
    pub fn new(profile: &GpioProfile, now_ms: u32, io: &mut impl ToolIoPort) -> Self {
        let mut engine = Self {
            armed: false,
            out_on: false,
            last_toggle_ms: now_ms,
            in_raw_last: true,
            in_change_ms: now_ms,
            in_debounced: true,
        };
        engine.init_pins(profile, now_ms, io);
        engine
    }

    fn init_pins(&mut self, profile: &GpioProfile, now_ms: u32, io: &mut impl ToolIoPort) {
        io.out_init(profile.out_gpio, !profile.out_active_high);
        io.in_init(profile.in_gpio);
        let raw = io.in_read(profile.in_gpio);
        self.in_raw_last = raw;
        self.in_debounced = raw;
        self.in_change_ms = now_ms;
        self.last_toggle_ms = now_ms;
        self.out_on = false;
        if profile.boot_all_off {
            self.write_out(profile, false, io);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the debounced interlock input currently blocks the output.
    pub fn interlock_blocked(&self, profile: &GpioProfile) -> bool {
        // Input idles high through the pull-up; asserted = pulled to ground.
        profile.interlock_blocks_out && !self.in_debounced
    }

    /// Arm or disarm.  Disarming forces the output off immediately.
    pub fn set_armed(&mut self, armed: bool, profile: &GpioProfile, io: &mut impl ToolIoPort) {
        self.armed = armed;
        if !armed {
            self.write_out(profile, false, io);
        }
        info!("tool engine {}", if armed { "armed" } else { "disarmed" });
    }

    /// Switch to a new profile: disarm, force off, reconfigure pins.
    pub fn change_profile(
        &mut self,
        profile: &GpioProfile,
        now_ms: u32,
        io: &mut impl ToolIoPort,
    ) {
        self.armed = false;
        self.init_pins(profile, now_ms, io);
        info!("tool profile: {}", profile.model.name());
    }

    /// One engine tick at `now_ms`.
    pub fn tick(&mut self, profile: &GpioProfile, now_ms: u32, io: &mut impl ToolIoPort) {
        self.debounce_input(profile, now_ms, io);

        // Interlock wins over everything, including an armed engine.  It
        // clears the armed flag so drive never silently resumes on release.
        if self.interlock_blocked(profile) {
            if self.armed {
                self.armed = false;
                info!("tool engine: interlock tripped, disarmed");
            }
            self.write_out(profile, false, io);
            return;
        }
        if !self.armed {
            self.write_out(profile, false, io);
            return;
        }

        match profile.model {
            ModelKind::Frequency => {
                let freq = profile.freq_hz.clamp(FREQ_MIN_HZ, FREQ_MAX_HZ);
                let half_ms = (500 / freq).max(1);
                if now_ms.wrapping_sub(self.last_toggle_ms) >= half_ms {
                    let next = !self.out_on;
                    self.write_out(profile, next, io);
                    self.last_toggle_ms = now_ms;
                }
            }
            // Serial models are driven by explicit set-speed frames only.
            ModelKind::Serial => {}
            ModelKind::DropIn => self.write_out(profile, true, io),
        }
    }

    /// Send a CF10B set-speed frame for the profile's frequency.  Only the
    /// serial model transmits, and only while armed.
    pub fn send_set_speed(
        &self,
        profile: &GpioProfile,
        tx: &mut impl FrameTxPort,
    ) -> bool {
        if profile.model != ModelKind::Serial || !self.armed {
            return false;
        }
        let freq = profile.freq_hz.clamp(FREQ_MIN_HZ, FREQ_MAX_HZ);
        tx.send(&cf10b::build_set_speed(cf10b::rpm_for_freq(freq)));
        true
    }

    fn debounce_input(&mut self, profile: &GpioProfile, now_ms: u32, io: &mut impl ToolIoPort) {
        let raw = io.in_read(profile.in_gpio);
        if raw != self.in_raw_last {
            self.in_raw_last = raw;
            self.in_change_ms = now_ms;
        }
        if now_ms.wrapping_sub(self.in_change_ms) >= profile.debounce_ms {
            self.in_debounced = raw;
        }
    }

    fn write_out(&mut self, profile: &GpioProfile, on: bool, io: &mut impl ToolIoPort) {
        self.out_on = on;
        io.out_write(profile.out_gpio, on == profile.out_active_high);
    }
}
