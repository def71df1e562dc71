//! One-shot hardware peripheral initialization and register-level shims.
//!
//! Configures the key GPIOs, the indicator LED, and the LEDC timer used for
//! the drive pin, using raw ESP-IDF sys calls.  Called once from `main()`
//! before the event loop starts.  On host targets every shim is a no-op so
//! the domain logic can run in tests and simulations.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(feature = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={rc})"),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={rc})"),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::Init("peripheral bring-up failed")
    }
}

// ── Bring-up ──────────────────────────────────────────────────

#[cfg(feature = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the event loop; single-threaded.
    unsafe {
        init_keys()?;
        init_led()?;
    }
    // The drive pin boots released; it is only ever driven after an explicit
    // user confirmation.
    drive_pin_hi_z();
    info!("hw_init: peripherals configured, drive pin Hi-Z");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(feature = "espidf")]
unsafe fn init_keys() -> Result<(), HwInitError> {
    for &pin in &pins::KEY_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    Ok(())
}

#[cfg(feature = "espidf")]
unsafe fn init_led() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::LED_GPIO, 0) };
    Ok(())
}

// ── Drive pin ─────────────────────────────────────────────────

/// Release the drive pin: input, no pulls.
#[cfg(feature = "espidf")]
pub fn drive_pin_hi_z() {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DRIVE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: register-level reconfiguration of a pin this module owns;
    // main-loop context only.
    unsafe {
        gpio_config(&cfg);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn drive_pin_hi_z() {}

/// Drive the pin push-pull LOW.
#[cfg(feature = "espidf")]
pub fn drive_pin_low() {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DRIVE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: same ownership contract as drive_pin_hi_z().
    unsafe {
        gpio_config(&cfg);
        gpio_set_level(pins::DRIVE_GPIO, 0);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn drive_pin_low() {}

/// Bind the LEDC generator to the drive pin and start the square wave.
#[cfg(feature = "espidf")]
pub fn pwm_start(freq_hz: u32, duty_percent: u8) -> Result<(), HwInitError> {
    // 8-bit resolution: 50 % = 128/256.
    let duty = (u32::from(duty_percent) * 256) / 100;
    // SAFETY: LEDC timer 0 / channel 0 are owned by this module; calls run
    // from the main loop only.
    unsafe {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: ledc_timer_t_LEDC_TIMER_0,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = ledc_timer_config(&timer);
        if ret != ESP_OK {
            return Err(HwInitError::LedcInitFailed(ret));
        }

        let channel = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: pins::LEDC_CH_DRIVE,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::DRIVE_GPIO,
            duty,
            hpoint: 0,
            ..Default::default()
        };
        let ret = ledc_channel_config(&channel);
        if ret != ESP_OK {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }
    info!("pwm: {freq_hz} Hz at {duty_percent}% duty");
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn pwm_start(_freq_hz: u32, _duty_percent: u8) -> Result<(), HwInitError> {
    Ok(())
}

/// Stop the generator and park its output low.  The caller reconfigures the
/// pin afterwards.
#[cfg(feature = "espidf")]
pub fn pwm_stop() {
    // SAFETY: channel was configured by pwm_start(); idle level 0.
    unsafe {
        ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, pins::LEDC_CH_DRIVE, 0);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn pwm_stop() {}

// ── Generic GPIO shims (LED, tool pins) ───────────────────────

#[cfg(feature = "espidf")]
pub fn gpio_out_init(pin: i32, level_high: bool) {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: main-loop configuration of a profile-owned pin.
    unsafe {
        gpio_config(&cfg);
        gpio_set_level(pin, u32::from(level_high));
    }
}

#[cfg(not(feature = "espidf"))]
pub fn gpio_out_init(_pin: i32, _level_high: bool) {}

#[cfg(feature = "espidf")]
pub fn gpio_in_init(pin: i32) {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: main-loop configuration of a profile-owned pin.
    unsafe {
        gpio_config(&cfg);
    }
}

#[cfg(not(feature = "espidf"))]
pub fn gpio_in_init(_pin: i32) {}

#[cfg(feature = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level on an already-configured output pin.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(feature = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(feature = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on a configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(feature = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO ISR service (keypad edges) ───────────────────────────

#[cfg(feature = "espidf")]
unsafe extern "C" fn key_gpio_isr(arg: *mut core::ffi::c_void) {
    let key_index = arg as usize;
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
    crate::drivers::keypad::isr_record_press(key_index, now_ms);
}

/// Install the GPIO ISR service and register the key edge handlers.
/// Call after `init_peripherals()` and before the event loop.
#[cfg(feature = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handlers only touch per-key
    // atomics in the keypad driver.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        for (idx, &pin) in pins::KEY_GPIOS.iter().enumerate() {
            gpio_isr_handler_add(pin, Some(key_gpio_isr), idx as *mut core::ffi::c_void);
            gpio_intr_enable(pin);
        }
        info!("hw_init: key ISRs installed");
    }
    Ok(())
}

#[cfg(not(feature = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Current raw key levels, converted to "true = held down" (active low).
pub fn key_levels() -> [bool; pins::KEY_GPIOS.len()] {
    let mut pressed = [false; pins::KEY_GPIOS.len()];
    for (idx, &pin) in pins::KEY_GPIOS.iter().enumerate() {
        pressed[idx] = !gpio_read(pin);
    }
    pressed
}
