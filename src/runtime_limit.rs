//! Runtime limiting — unattended-run protection.
//!
//! Each non-idle mode carries a default limit in seconds.  While limiting is
//! enabled and such a mode is active, two timers run: a 1 Hz periodic tick
//! that drives the on-screen countdown, and a one-shot at the precise limit
//! so the auto-off moment does not accumulate tick jitter.  Both fire as
//! queue events; the main loop performs the actual switch to standby.

use log::info;

use crate::app::ports::{TimerId, TimerPort};
use crate::modes;

/// Countdown bookkeeping for the active mode.
pub struct RuntimeLimiter {
    enabled: bool,
    remaining_ms: u32,
}

impl RuntimeLimiter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, remaining_ms: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether a countdown is currently tracked.
    pub fn is_counting(&self) -> bool {
        self.remaining_ms > 0
    }

    /// Seconds left, rounded up, for the countdown badge.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000)
    }

    /// Restart the countdown for the mode at `active`, or cancel it when the
    /// mode is unlimited, idle, or limiting is disabled.
    ///
    /// Always cancels first, so re-applying the same mode or toggling the
    /// limit yields a full fresh window rather than a resumed one.
    pub fn rearm(&mut self, active: Option<usize>, timers: &mut impl TimerPort) {
        timers.cancel(TimerId::RuntimeTick);
        timers.cancel(TimerId::RuntimeExpiry);
        self.remaining_ms = 0;

        if !self.enabled {
            return;
        }
        let Some(limit_secs) = active
            .and_then(modes::mode_at)
            .map(|m| m.default_limit_secs)
            .filter(|&s| s > 0)
        else {
            return;
        };

        self.remaining_ms = limit_secs * 1000;
        timers.start_periodic(TimerId::RuntimeTick, 1000);
        timers.start_oneshot(TimerId::RuntimeExpiry, self.remaining_ms);
        info!("runtime limit armed: {limit_secs} s");
    }

    /// Stop the countdown without touching the enabled flag.
    pub fn cancel(&mut self, timers: &mut impl TimerPort) {
        timers.cancel(TimerId::RuntimeTick);
        timers.cancel(TimerId::RuntimeExpiry);
        self.remaining_ms = 0;
    }

    /// 1 Hz display tick.  Clamped at zero; the one-shot expiry event is the
    /// authority for auto-off, not this counter.
    pub fn on_second_tick(&mut self) {
        self.remaining_ms = self.remaining_ms.saturating_sub(1000);
    }
}
