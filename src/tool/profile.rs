//! Tool profiles: per-model pin and timing presets.
//!
//! A profile bundles everything the engine needs for one compressor model
//! class.  Profiles persist as `key=value` records, one per line, tolerant
//! on load: unknown keys are skipped and unparseable values keep their
//! current setting, so an old or hand-edited record degrades gracefully.

use core::fmt::Write as _;

use log::warn;

use crate::error::StoreError;
use crate::pins::{TOOL_IN0_GPIO, TOOL_OUT0_GPIO, tool_pin_by_name, tool_pin_name};

/// Compressor model class the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Square-wave frequency drive (legacy variable-speed inverters).
    Frequency,
    /// CF10B serial set-speed frames; output pin stays quiet.
    Serial,
    /// Steady enable output (drop-in controller boards).
    DropIn,
}

impl ModelKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Frequency => "FREQUENCY",
            Self::Serial => "SERIAL",
            Self::DropIn => "DROPIN",
        }
    }
}

/// All selectable models, in menu order.
pub static MODELS: &[ModelKind] = &[ModelKind::Frequency, ModelKind::Serial, ModelKind::DropIn];

/// One tool profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioProfile {
    pub model: ModelKind,
    pub out_gpio: i32,
    pub in_gpio: i32,
    /// Logical "on" drives the pin high when true, low when false.
    pub out_active_high: bool,
    /// Interlock input debounce window, milliseconds.
    pub debounce_ms: u32,
    /// Square-wave frequency for [`ModelKind::Frequency`], Hz.
    pub freq_hz: u32,
    pub duty_percent: u8,
    /// Force every output off at engine start.
    pub boot_all_off: bool,
    /// Asserted interlock input forces the output off, whatever the model.
    pub interlock_blocks_out: bool,
}

impl GpioProfile {
    /// Built-in defaults for a model.
    pub fn preset(model: ModelKind) -> Self {
        Self {
            model,
            out_gpio: TOOL_OUT0_GPIO,
            in_gpio: TOOL_IN0_GPIO,
            out_active_high: true,
            debounce_ms: 20,
            freq_hz: 150,
            duty_percent: 50,
            boot_all_off: true,
            interlock_blocks_out: true,
        }
    }

    /// Serialize as a `key=value` record.
    pub fn to_record(&self) -> String {
        let mut s = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(s, "out0={}", tool_pin_name(self.out_gpio));
        let _ = writeln!(s, "in0={}", tool_pin_name(self.in_gpio));
        let _ = writeln!(s, "active_high={}", u8::from(self.out_active_high));
        let _ = writeln!(s, "debounce_ms={}", self.debounce_ms);
        let _ = writeln!(s, "pwm_freq_hz={}", self.freq_hz);
        let _ = writeln!(s, "pwm_duty_pc={}", self.duty_percent);
        let _ = writeln!(s, "boot_all_off={}", u8::from(self.boot_all_off));
        let _ = writeln!(s, "interlock_in0_blocks_out0={}", u8::from(self.interlock_blocks_out));
        s
    }

    /// Apply a `key=value` record over `self`.
    ///
    /// Returns [`StoreError::Corrupted`] only when no line parsed at all;
    /// individual bad lines are skipped with a warning.
    pub fn apply_record(&mut self, record: &str) -> Result<(), StoreError> {
        let mut applied = 0usize;
        for line in record.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!("profile record: malformed line {line:?}");
                continue;
            };
            if self.apply_kv(key.trim(), value.trim()) {
                applied += 1;
            } else {
                warn!("profile record: rejected {key}={value}");
            }
        }
        if applied == 0 { Err(StoreError::Corrupted) } else { Ok(()) }
    }

    fn apply_kv(&mut self, key: &str, value: &str) -> bool {
        fn flag(value: &str) -> Option<bool> {
            match value {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            }
        }
        match key {
            "out0" => match tool_pin_by_name(value) {
                Some(gpio) => {
                    self.out_gpio = gpio;
                    true
                }
                None => false,
            },
            "in0" => match tool_pin_by_name(value) {
                Some(gpio) => {
                    self.in_gpio = gpio;
                    true
                }
                None => false,
            },
            "active_high" => flag(value).map(|v| self.out_active_high = v).is_some(),
            "debounce_ms" => value.parse().map(|v| self.debounce_ms = v).is_ok(),
            "pwm_freq_hz" => value.parse().map(|v| self.freq_hz = v).is_ok(),
            "pwm_duty_pc" => value.parse().map(|v| self.duty_percent = v).is_ok(),
            "boot_all_off" => flag(value).map(|v| self.boot_all_off = v).is_some(),
            "interlock_in0_blocks_out0" => {
                flag(value).map(|v| self.interlock_blocks_out = v).is_some()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_conservative_defaults() {
        for &model in MODELS {
            let p = GpioProfile::preset(model);
            assert!(p.out_active_high);
            assert_eq!(p.debounce_ms, 20);
            assert_eq!(p.freq_hz, 150);
            assert_eq!(p.duty_percent, 50);
            assert!(p.boot_all_off);
            assert!(p.interlock_blocks_out);
        }
    }

    #[test]
    fn record_roundtrip() {
        let mut p = GpioProfile::preset(ModelKind::Frequency);
        p.out_gpio = crate::pins::TOOL_AUX_GPIO;
        p.debounce_ms = 35;
        p.freq_hz = 120;
        p.out_active_high = false;

        let mut q = GpioProfile::preset(ModelKind::Frequency);
        q.apply_record(&p.to_record()).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn bad_lines_are_skipped_not_fatal() {
        let mut p = GpioProfile::preset(ModelKind::Serial);
        let res = p.apply_record("debounce_ms=40\npwm_freq_hz=banana\nmystery=1\nnot a pair\n");
        assert!(res.is_ok());
        assert_eq!(p.debounce_ms, 40);
        assert_eq!(p.freq_hz, 150, "bad value keeps the current setting");
    }

    #[test]
    fn fully_garbled_record_is_corrupted() {
        let mut p = GpioProfile::preset(ModelKind::DropIn);
        assert_eq!(p.apply_record("###\nxyzzy\n"), Err(StoreError::Corrupted));
        assert_eq!(p, GpioProfile::preset(ModelKind::DropIn));
    }

    #[test]
    fn unknown_pin_name_is_rejected() {
        let mut p = GpioProfile::preset(ModelKind::Frequency);
        let before = p.out_gpio;
        let _ = p.apply_record("out0=P99\nin0=P12\n");
        assert_eq!(p.out_gpio, before);
        assert_eq!(p.in_gpio, crate::pins::TOOL_AUX_GPIO);
    }
}
