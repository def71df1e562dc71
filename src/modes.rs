//! Static operating-mode table.
//!
//! A mode is a (drive frequency, LED blink rate, default runtime limit)
//! triple.  Index is the identity used throughout the UI and the power
//! state machine; index 0 is always the idle/standby mode (no PWM, pin
//! actively held LOW while powered).

/// One operating mode of the inverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    /// Drive frequency in Hz.  0 = no PWM (standby: push-pull LOW).
    pub freq_hz: u32,
    /// Indicator blink rate in Hz — one of 0, 1, 2, 4.
    pub led_blink_hz: u8,
    /// Runtime limit in seconds when limiting is enabled.  0 = unlimited.
    pub default_limit_secs: u32,
}

/// Index of the idle/standby mode.  Invariant: `MODES[IDLE_MODE].freq_hz == 0`
/// and no other mode has frequency 0.
pub const IDLE_MODE: usize = 0;

/// The powered-menu mode table.  Fixed at startup; indexed identity.
pub static MODES: &[Mode] = &[
    Mode {
        name: "Stand by",
        freq_hz: 0,
        led_blink_hz: 0,
        default_limit_secs: 0,
    },
    Mode {
        name: "Low speed",
        freq_hz: 55,
        led_blink_hz: 1,
        default_limit_secs: 120,
    },
    Mode {
        name: "Mid speed",
        freq_hz: 100,
        led_blink_hz: 2,
        default_limit_secs: 60,
    },
    Mode {
        name: "Max speed",
        freq_hz: 160,
        led_blink_hz: 4,
        default_limit_secs: 30,
    },
];

/// Mode count, for row arithmetic in the menu.
pub fn mode_count() -> usize {
    MODES.len()
}

/// Look up a mode by index.  Out-of-range indices yield `None` and the
/// caller treats the request as a no-op.
pub fn mode_at(idx: usize) -> Option<&'static Mode> {
    MODES.get(idx)
}

// ---------------------------------------------------------------------------
// Inverter variant identity
// ---------------------------------------------------------------------------

/// Supported inverter families.  Affects the title and help text; mode
/// presets are shared for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InverterKind {
    #[default]
    Embraco,
    Samsung,
}

impl InverterKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Embraco => "Embraco",
            Self::Samsung => "Samsung",
        }
    }

    /// Wiring / speed reference shown on the help screen.
    pub fn help_lines(self) -> &'static [&'static str] {
        match self {
            Self::Embraco => HELP_EMBRACO,
            Self::Samsung => HELP_SAMSUNG,
        }
    }
}

static HELP_EMBRACO: &[&str] = &[
    "Connect wires as follows:",
    "",
    "DRIVE  -> inverter +",
    "(usually RED wire)",
    "GND    -> inverter -",
    "(usually WHITE wire)",
    "",
    "Note:",
    "This app provides",
    "3 test speeds:",
    "",
    "Low speed:",
    "2000 RPM (VNE)",
    "1800 RPM (VEG, FMF)",
    "",
    "Mid speed:",
    "3000 RPM",
    "(VNE, VEG, FMF)",
    "",
    "Max speed:",
    "4500 RPM",
    "(VNE, VEG, FMF)",
    "",
    "Embraco compressors",
    "support many speeds",
    "with 30 RPM steps.",
    "",
    "Press BACK to start.",
];

static HELP_SAMSUNG: &[&str] = &["In development"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_idle_mode_at_index_zero() {
        let idle_count = MODES.iter().filter(|m| m.freq_hz == 0).count();
        assert_eq!(idle_count, 1);
        assert_eq!(MODES[IDLE_MODE].freq_hz, 0);
    }

    #[test]
    fn idle_mode_has_no_blink_and_no_limit() {
        assert_eq!(MODES[IDLE_MODE].led_blink_hz, 0);
        assert_eq!(MODES[IDLE_MODE].default_limit_secs, 0);
    }

    #[test]
    fn blink_rates_are_supported_values() {
        for m in MODES {
            assert!(
                matches!(m.led_blink_hz, 0 | 1 | 2 | 4),
                "{} has blink {}",
                m.name,
                m.led_blink_hz
            );
        }
    }

    #[test]
    fn mode_at_rejects_out_of_range() {
        assert!(mode_at(MODES.len()).is_none());
        assert!(mode_at(usize::MAX).is_none());
        assert_eq!(mode_at(IDLE_MODE).unwrap().name, "Stand by");
    }

    #[test]
    fn faster_modes_have_shorter_limits() {
        // Higher drive frequency means more mechanical stress, so the
        // default unattended-runtime allowance shrinks.
        let limited: Vec<_> = MODES.iter().filter(|m| m.freq_hz > 0).collect();
        for pair in limited.windows(2) {
            assert!(pair[0].freq_hz < pair[1].freq_hz);
            assert!(pair[0].default_limit_secs > pair[1].default_limit_secs);
        }
    }

    #[test]
    fn help_text_exists_for_both_variants() {
        assert!(!InverterKind::Embraco.help_lines().is_empty());
        assert!(!InverterKind::Samsung.help_lines().is_empty());
        assert_eq!(InverterKind::Embraco.name(), "Embraco");
    }
}
