//! Power / safety state machine for the drive pin.
//!
//! The drive pin is only ever in one of three electrical states:
//!
//! - **Hi-Z** — released, floating.  The only state in which connecting or
//!   disconnecting inverter wires is safe.  Entered whenever the inverter is
//!   logically powered off, and unconditionally on shutdown.
//! - **Push-pull LOW** — powered standby (mode 0).  Tells the inverter
//!   "connected, speed zero".
//! - **PWM** — fixed 50 % duty square wave at the active mode's frequency.
//!
//! Every transition between drive states runs the same sequence: stop the
//! PWM generator if it is running, wait out a short settle pause, then
//! configure the new state.  The generator is never started while a previous
//! configuration is live and the pin never floats mid-transition.

use log::info;

use crate::app::ports::{ActuatorPort, TimerId, TimerPort};
use crate::modes::{self, IDLE_MODE};
use crate::pins::DRIVE_DUTY_PERCENT;

/// Logical power state of the inverter connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Drive pin Hi-Z.  Safe to touch wiring.
    Disconnected,
    /// Drive pin actively held: LOW when `mode == IDLE_MODE`, PWM otherwise.
    Powered { mode: usize },
}

/// Owns the drive pin and the indicator blink schedule.
pub struct PowerController {
    state: PowerState,
    settle_delay_ms: u32,
}

/// Indicator toggle period for a blink rate.  A full blink cycle is two
/// toggles, so 1 Hz blinking toggles every 500 ms.  `None` = steady off.
pub fn led_toggle_period_ms(blink_hz: u8) -> Option<u32> {
    if blink_hz == 0 {
        return None;
    }
    Some((1000 / (2 * u32::from(blink_hz))).max(1))
}

impl PowerController {
    pub fn new(settle_delay_ms: u32) -> Self {
        Self {
            state: PowerState::Disconnected,
            settle_delay_ms,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn is_powered(&self) -> bool {
        matches!(self.state, PowerState::Powered { .. })
    }

    /// Index of the active mode, or `None` when disconnected.
    pub fn active_mode(&self) -> Option<usize> {
        match self.state {
            PowerState::Powered { mode } => Some(mode),
            PowerState::Disconnected => None,
        }
    }

    /// Power on into standby.  The caller has already obtained user
    /// confirmation.  No-op when already powered.
    pub fn power_on(&mut self, hw: &mut impl ActuatorPort) {
        if self.is_powered() {
            return;
        }
        hw.pin_drive_low();
        self.state = PowerState::Powered { mode: IDLE_MODE };
        info!("power on: standby (pin LOW)");
    }

    /// Switch to the mode at `idx`.
    ///
    /// Returns `false` (silent no-op) when disconnected or when `idx` is out
    /// of range.  Re-applying the active mode re-affirms the indicator
    /// schedule without restarting the generator or re-driving the pin.
    pub fn apply_mode(
        &mut self,
        idx: usize,
        hw: &mut impl ActuatorPort,
        timers: &mut impl TimerPort,
    ) -> bool {
        let PowerState::Powered { mode: current } = self.state else {
            return false;
        };
        let Some(mode) = modes::mode_at(idx) else {
            return false;
        };

        if idx != current {
            // Stop-before-start: the generator must be quiesced and the pin
            // settled before any reconfiguration.
            if hw.pwm_running() {
                hw.pwm_stop();
            }
            hw.settle_delay(self.settle_delay_ms);

            if mode.freq_hz == 0 {
                hw.pin_drive_low();
            } else {
                hw.pwm_start(mode.freq_hz, DRIVE_DUTY_PERCENT);
            }
            self.state = PowerState::Powered { mode: idx };
            info!("mode {} ({}): {} Hz", idx, mode.name, mode.freq_hz);
        }

        // Indicator schedule is idempotent to re-affirm: timers are keyed,
        // so a restart replaces rather than duplicates.
        timers.cancel(TimerId::LedBlink);
        hw.led_set(false);
        if let Some(period) = led_toggle_period_ms(mode.led_blink_hz) {
            timers.start_periodic(TimerId::LedBlink, period);
        }
        true
    }

    /// Power off: quiesce the generator and release the pin.  No-op when
    /// already disconnected.
    pub fn power_off(&mut self, hw: &mut impl ActuatorPort, timers: &mut impl TimerPort) {
        if !self.is_powered() {
            return;
        }
        self.force_safe(hw, timers);
        info!("power off: pin released (Hi-Z)");
    }

    /// Unconditionally put the pin into the safe state.  Runs the full stop
    /// sequence regardless of what the logical state claims; used by the
    /// shutdown guard so a torn-down application can never leave the pin
    /// driven.
    pub fn force_safe(&mut self, hw: &mut impl ActuatorPort, timers: &mut impl TimerPort) {
        if hw.pwm_running() {
            hw.pwm_stop();
        }
        hw.settle_delay(self.settle_delay_ms);
        hw.pin_hi_z();
        timers.cancel(TimerId::LedBlink);
        hw.led_set(false);
        self.state = PowerState::Disconnected;
    }
}
