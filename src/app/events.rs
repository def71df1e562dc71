//! Notable application-state changes, published to an [`EventSink`].
//!
//! These are observability events, distinct from the input events in
//! [`crate::events`]: they describe what the core *did*, not what the
//! user or a timer *requested*.
//!
//! [`EventSink`]: crate::app::ports::EventSink

use crate::modes::InverterKind;

/// Why the inverter was powered off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffReason {
    /// The user picked "Power off" from the menu.
    UserRequest,
    /// Application shutdown (exit or panic unwind).
    Shutdown,
}

/// State changes worth observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Started,
    InverterSelected(InverterKind),
    PoweredOn,
    ModeApplied { index: usize, freq_hz: u32 },
    CountdownStarted { secs: u32 },
    /// Runtime limit fired; the inverter dropped to standby, still powered.
    CountdownExpired,
    PoweredOff { reason: OffReason },
    LimitChanged { enabled: bool },
    Exited,
}
