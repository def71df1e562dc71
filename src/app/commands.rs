//! Commands produced by the navigation layer.
//!
//! Key handling is pure: the UI state machine consumes `(screen, key)` and
//! yields zero or more commands.  The service executes them against the
//! ports, so every hardware side effect is traceable to one command.

use crate::modes::InverterKind;

/// An action requested by the user through the menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Switch the powered inverter to the mode at this index.
    ApplyMode(usize),
    /// Power on into standby.  Requires dialog confirmation first.
    RequestPowerOn,
    /// Power off and release the drive pin.
    PowerOff,
    /// Toggle runtime limiting.  Turning it off requires confirmation.
    RequestLimitToggle,
    /// The user picked an inverter family on the selection screen.
    SelectInverter(InverterKind),
    /// Show the "hold BACK to exit" hint and arm its timeout.
    ShowExitHint,
}
