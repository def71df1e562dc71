//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! The only module outside `drivers` that touches actual pins.  It also
//! mirrors the drive-pin mode in software so `pwm_running()` never has to
//! read back LEDC state, and so host tests see the same behaviour.

use log::warn;

use crate::app::ports::{ActuatorPort, FrameTxPort, ToolIoPort};
use crate::drivers::hw_init;
use crate::pins;

/// What the drive pin is electrically doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    HiZ,
    Low,
    Pwm,
}

/// Concrete adapter over the starter board peripherals.
pub struct HardwareAdapter {
    drive_mode: DriveMode,
}

impl HardwareAdapter {
    pub fn new() -> Self {
        Self { drive_mode: DriveMode::HiZ }
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for HardwareAdapter {
    fn pin_hi_z(&mut self) {
        hw_init::drive_pin_hi_z();
        self.drive_mode = DriveMode::HiZ;
    }

    fn pin_drive_low(&mut self) {
        hw_init::drive_pin_low();
        self.drive_mode = DriveMode::Low;
    }

    fn pwm_start(&mut self, freq_hz: u32, duty_percent: u8) {
        match hw_init::pwm_start(freq_hz, duty_percent) {
            Ok(()) => self.drive_mode = DriveMode::Pwm,
            Err(e) => {
                // A failed start leaves the generator unbound; park the pin
                // low rather than let it float in an unknown state.
                warn!("pwm start failed: {e}; parking pin low");
                hw_init::drive_pin_low();
                self.drive_mode = DriveMode::Low;
            }
        }
    }

    fn pwm_stop(&mut self) {
        hw_init::pwm_stop();
        if self.drive_mode == DriveMode::Pwm {
            self.drive_mode = DriveMode::Low;
        }
    }

    fn pwm_running(&self) -> bool {
        self.drive_mode == DriveMode::Pwm
    }

    fn settle_delay(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }

    fn led_set(&mut self, on: bool) {
        hw_init::gpio_write(pins::LED_GPIO, on);
    }
}

impl ToolIoPort for HardwareAdapter {
    fn out_init(&mut self, gpio: i32, level_high: bool) {
        hw_init::gpio_out_init(gpio, level_high);
    }

    fn out_write(&mut self, gpio: i32, level_high: bool) {
        hw_init::gpio_write(gpio, level_high);
    }

    fn in_init(&mut self, gpio: i32) {
        hw_init::gpio_in_init(gpio);
    }

    fn in_read(&mut self, gpio: i32) -> bool {
        hw_init::gpio_read(gpio)
    }
}

/// Set-speed frames go out as a bit-banged log line for now; the CF10B
/// header has no dedicated UART on this board revision.
pub struct LogFrameTx;

impl FrameTxPort for LogFrameTx {
    fn send(&mut self, frame: &[u8]) {
        let mut hex = String::with_capacity(frame.len() * 3);
        for b in frame {
            use core::fmt::Write as _;
            let _ = write!(hex, "{b:02X} ");
        }
        log::info!("cf10b tx: {}", hex.trim_end());
    }
}
