//! GPIO / peripheral pin assignments for the starter board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Inverter drive output
// ---------------------------------------------------------------------------

/// PWM-capable drive pin wired to the inverter frequency input.
/// Hi-Z when disconnected, push-pull LOW in standby, LEDC PWM when running.
pub const DRIVE_GPIO: i32 = 1;

/// LEDC channel carrying the drive waveform.
pub const LEDC_CH_DRIVE: u32 = 0;

/// Drive PWM duty in percent.  The inverter samples frequency only, so the
/// waveform is always a 50% square.
pub const DRIVE_DUTY_PERCENT: u8 = 50;

// ---------------------------------------------------------------------------
// Indicator LED
// ---------------------------------------------------------------------------

/// Digital output: activity indicator (active HIGH).
pub const LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Keypad (active-low momentary switches with external pull-ups)
// ---------------------------------------------------------------------------

pub const KEY_UP_GPIO: i32 = 4;
pub const KEY_DOWN_GPIO: i32 = 5;
pub const KEY_OK_GPIO: i32 = 6;
pub const KEY_BACK_GPIO: i32 = 7;

/// Key pins in classifier order (UP, DOWN, OK, BACK).
pub const KEY_GPIOS: [i32; 4] = [KEY_UP_GPIO, KEY_DOWN_GPIO, KEY_OK_GPIO, KEY_BACK_GPIO];

// ---------------------------------------------------------------------------
// CF10B tool header
// ---------------------------------------------------------------------------

/// Default tool output (square wave / serial TX side).
pub const TOOL_OUT0_GPIO: i32 = 10;
/// Default tool input (interlock / drop-in monitor).
pub const TOOL_IN0_GPIO: i32 = 11;
/// Spare header pin selectable from the profile editor.
pub const TOOL_AUX_GPIO: i32 = 12;

/// Named pins selectable as `out0`/`in0` in a [`GpioProfile`].
/// Names are what the persisted profile records store.
///
/// [`GpioProfile`]: crate::tool::profile::GpioProfile
pub const TOOL_PIN_TABLE: &[(&str, i32)] = &[
    ("P10", TOOL_OUT0_GPIO),
    ("P11", TOOL_IN0_GPIO),
    ("P12", TOOL_AUX_GPIO),
];

/// Look up a tool pin GPIO by its persisted name.
pub fn tool_pin_by_name(name: &str) -> Option<i32> {
    TOOL_PIN_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, gpio)| *gpio)
}

/// Reverse lookup: persisted name for a tool GPIO, `"NA"` if unknown.
pub fn tool_pin_name(gpio: i32) -> &'static str {
    TOOL_PIN_TABLE
        .iter()
        .find(|(_, g)| *g == gpio)
        .map_or("NA", |(n, _)| n)
}
