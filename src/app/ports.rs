//! Port traits — the boundary between the application core and the world.
//!
//! Adapters in `crate::adapters` implement these against real ESP-IDF
//! peripherals (or host simulations); tests implement them with mocks that
//! record calls.  The core never touches a register or a file directly.

use crate::app::events::AppEvent;
use crate::config::SystemConfig;
use crate::error::StoreError;
use crate::tool::profile::GpioProfile;
use crate::ui::ScreenModel;

/// Drive-pin and indicator actuation.
///
/// The drive pin has exactly three electrical states and every transition
/// between them goes through this trait, so the stop-before-start ordering
/// can be asserted from the call sequence alone.
pub trait ActuatorPort {
    /// Release the drive pin: input mode, no pulls (high impedance).
    fn pin_hi_z(&mut self);
    /// Drive the pin push-pull LOW (powered standby).
    fn pin_drive_low(&mut self);
    /// Start the PWM generator on the drive pin.
    fn pwm_start(&mut self, freq_hz: u32, duty_percent: u8);
    /// Stop the PWM generator.  Harmless when it is not running.
    fn pwm_stop(&mut self);
    /// Whether the PWM generator currently owns the pin.
    fn pwm_running(&self) -> bool;
    /// Block for the post-stop settle pause before reconfiguring the pin.
    fn settle_delay(&mut self, ms: u32);
    /// Set the indicator LED level.
    fn led_set(&mut self, on: bool);
}

/// Identity of a software timer owned by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// Periodic indicator-blink toggle.
    LedBlink,
    /// Periodic 1 Hz countdown display tick.
    RuntimeTick,
    /// One-shot precise runtime-limit expiry.
    RuntimeExpiry,
    /// One-shot back-hint overlay timeout.
    Hint,
    /// Periodic CF10B tool engine cadence.
    EngineTick,
}

/// Timer scheduling.
///
/// Callbacks never run application logic: each fired timer only posts the
/// matching [`crate::events::Event`] into the queue for the main loop.
/// Starting a timer that is already running reschedules it.
pub trait TimerPort {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32);
    fn start_oneshot(&mut self, id: TimerId, delay_ms: u32);
    fn cancel(&mut self, id: TimerId);
    /// Cancel every timer.  Used on shutdown before releasing the pin.
    fn cancel_all(&mut self);
}

/// Blocking yes/no confirmation.
///
/// `true` means the user accepted.  Used before the first power-on and
/// before disabling runtime limiting.
pub trait DialogPort {
    fn confirm(&mut self, header: &str, body: &str) -> bool;
}

/// Screen output.  The core renders a [`ScreenModel`] and hands it over;
/// pixel work happens behind this trait.
pub trait DisplayPort {
    fn present(&mut self, model: &ScreenModel);
}

/// Observer for notable state changes (logging, diagnostics).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

/// Persistence for tool profiles and system configuration.
pub trait StorePort {
    /// Load the named profile over `profile`.  On any failure the caller
    /// keeps built-in defaults.
    fn load_profile(&self, name: &str, profile: &mut GpioProfile)
    -> core::result::Result<(), StoreError>;
    /// Persist the named profile.
    fn save_profile(&mut self, name: &str, profile: &GpioProfile)
    -> core::result::Result<(), StoreError>;
    /// Load the system configuration blob.
    fn load_config(&self) -> core::result::Result<SystemConfig, StoreError>;
    /// Persist the system configuration blob.
    fn save_config(&mut self, config: &SystemConfig) -> core::result::Result<(), StoreError>;
}

/// Digital I/O for the tool's configurable output/interlock pins.
///
/// Kept separate from [`ActuatorPort`]: the tool engine works on arbitrary
/// profile-selected pins, not the fixed drive pin.
pub trait ToolIoPort {
    /// Configure `gpio` as an output and set its idle level.
    fn out_init(&mut self, gpio: i32, level_high: bool);
    /// Write an output pin configured by [`Self::out_init`].
    fn out_write(&mut self, gpio: i32, level_high: bool);
    /// Configure `gpio` as an input with pull-up.
    fn in_init(&mut self, gpio: i32);
    /// Read the raw level of an input pin.
    fn in_read(&mut self, gpio: i32) -> bool;
}

/// Byte-frame transmit for the serial compressor protocol.
pub trait FrameTxPort {
    fn send(&mut self, frame: &[u8]);
}
