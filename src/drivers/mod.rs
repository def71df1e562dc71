//! Hardware drivers: peripheral bring-up, keypad gestures, tick timers.

pub mod hw_init;
pub mod hw_timer;
pub mod keypad;
