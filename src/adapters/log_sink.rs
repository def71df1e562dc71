//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the serial
//! logger.  A future telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START"),
            AppEvent::InverterSelected(kind) => info!("INVERTER | {}", kind.name()),
            AppEvent::PoweredOn => info!("POWER | on (standby)"),
            AppEvent::ModeApplied { index, freq_hz } => {
                info!("MODE | #{index} at {freq_hz} Hz");
            }
            AppEvent::CountdownStarted { secs } => info!("LIMIT | armed, {secs}s"),
            AppEvent::CountdownExpired => info!("LIMIT | expired, dropping to standby"),
            AppEvent::PoweredOff { reason } => info!("POWER | off ({reason:?})"),
            AppEvent::LimitChanged { enabled } => info!("LIMIT | enabled={enabled}"),
            AppEvent::Exited => info!("EXIT"),
        }
    }
}
