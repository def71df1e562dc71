//! Application timers built on ESP-IDF's esp_timer API.
//!
//! Each [`TimerId`] owns one esp_timer whose callback pushes the matching
//! event into the lock-free queue.  Callbacks run in the esp_timer task
//! context (not ISR) and never touch application state.
//!
//! Host targets get [`SimTimers`], a deadline table advanced explicitly
//! from the loop, so the same event flow can be driven in tests.

use crate::app::ports::{TimerId, TimerPort};
use crate::events::{Event, push_event};

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

const TIMER_COUNT: usize = 5;

const TIMER_IDS: [TimerId; TIMER_COUNT] = [
    TimerId::LedBlink,
    TimerId::RuntimeTick,
    TimerId::RuntimeExpiry,
    TimerId::Hint,
    TimerId::EngineTick,
];

fn slot_index(id: TimerId) -> usize {
    match id {
        TimerId::LedBlink => 0,
        TimerId::RuntimeTick => 1,
        TimerId::RuntimeExpiry => 2,
        TimerId::Hint => 3,
        TimerId::EngineTick => 4,
    }
}

/// Queue event a fired timer produces.
fn event_for(id: TimerId) -> Event {
    match id {
        TimerId::LedBlink => Event::LedToggle,
        TimerId::RuntimeTick => Event::RuntimeTick,
        TimerId::RuntimeExpiry => Event::RuntimeExpired,
        TimerId::Hint => Event::HintTimeout,
        TimerId::EngineTick => Event::EngineTick,
    }
}

// ── ESP-IDF implementation ────────────────────────────────────

#[cfg(feature = "espidf")]
pub struct EspTimers {
    handles: [esp_timer_handle_t; TIMER_COUNT],
}

#[cfg(feature = "espidf")]
unsafe extern "C" fn timer_cb(arg: *mut core::ffi::c_void) {
    let idx = arg as usize;
    if idx < TIMER_COUNT {
        push_event(event_for(TIMER_IDS[idx]));
    }
}

#[cfg(feature = "espidf")]
impl EspTimers {
    /// Create all application timers, stopped.
    pub fn new() -> Result<Self, crate::error::Error> {
        let mut handles: [esp_timer_handle_t; TIMER_COUNT] = [core::ptr::null_mut(); TIMER_COUNT];
        for (idx, handle) in handles.iter_mut().enumerate() {
            let args = esp_timer_create_args_t {
                callback: Some(timer_cb),
                arg: idx as *mut core::ffi::c_void,
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: b"app\0".as_ptr() as *const _,
                skip_unhandled_events: true,
            };
            // SAFETY: handle slot outlives the timer; created once at boot
            // from the main task.
            let ret = unsafe { esp_timer_create(&args, handle) };
            if ret != ESP_OK {
                log::error!("hw_timer: create failed (rc={ret})");
                return Err(crate::error::Error::Init("esp_timer create failed"));
            }
        }
        Ok(Self { handles })
    }

    fn handle(&self, id: TimerId) -> esp_timer_handle_t {
        self.handles[slot_index(id)]
    }
}

#[cfg(feature = "espidf")]
impl TimerPort for EspTimers {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        // SAFETY: handles were created in new(); stop-before-start makes the
        // call safe whether or not the timer is running.
        unsafe {
            esp_timer_stop(self.handle(id));
            esp_timer_start_periodic(self.handle(id), u64::from(period_ms) * 1_000);
        }
    }

    fn start_oneshot(&mut self, id: TimerId, delay_ms: u32) {
        // SAFETY: as in start_periodic().
        unsafe {
            esp_timer_stop(self.handle(id));
            esp_timer_start_once(self.handle(id), u64::from(delay_ms) * 1_000);
        }
    }

    fn cancel(&mut self, id: TimerId) {
        // SAFETY: stopping a stopped timer returns ESP_ERR_INVALID_STATE,
        // which is fine here.
        unsafe {
            esp_timer_stop(self.handle(id));
        }
    }

    fn cancel_all(&mut self) {
        for id in TIMER_IDS {
            self.cancel(id);
        }
    }
}

#[cfg(feature = "espidf")]
impl Drop for EspTimers {
    fn drop(&mut self) {
        for &handle in &self.handles {
            if !handle.is_null() {
                // SAFETY: stop + delete of a handle created in new().
                unsafe {
                    esp_timer_stop(handle);
                    esp_timer_delete(handle);
                }
            }
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct SimSlot {
    deadline_ms: u32,
    period_ms: Option<u32>,
}

/// Deadline table advanced by [`SimTimers::poll`].
#[derive(Default)]
pub struct SimTimers {
    now_ms: u32,
    slots: [Option<SimSlot>; TIMER_COUNT],
}

impl SimTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulated time to `now_ms` and push every due event, in
    /// firing order.  Periodic slots reschedule themselves.
    pub fn poll(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
        loop {
            // Earliest due slot first, so interleaved periodics fire in order.
            let due = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(idx, s)| s.map(|s| (idx, s)))
                .filter(|(_, s)| s.deadline_ms <= now_ms)
                .min_by_key(|(_, s)| s.deadline_ms);
            let Some((idx, slot)) = due else { break };

            push_event(event_for(TIMER_IDS[idx]));
            self.slots[idx] = slot.period_ms.map(|p| SimSlot {
                deadline_ms: slot.deadline_ms + p,
                period_ms: Some(p),
            });
        }
    }
}

impl TimerPort for SimTimers {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        self.slots[slot_index(id)] = Some(SimSlot {
            deadline_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
        });
    }

    fn start_oneshot(&mut self, id: TimerId, delay_ms: u32) {
        self.slots[slot_index(id)] = Some(SimSlot {
            deadline_ms: self.now_ms + delay_ms,
            period_ms: None,
        });
    }

    fn cancel(&mut self, id: TimerId) {
        self.slots[slot_index(id)] = None;
    }

    fn cancel_all(&mut self) {
        self.slots = [None; TIMER_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{pop_event, queue_is_empty};

    // SimTimers tests drain the shared static queue; serialize them.
    static QUEUE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn drain_all() {
        while pop_event().is_some() {}
    }

    #[test]
    fn oneshot_fires_once() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();
        let mut timers = SimTimers::new();
        timers.start_oneshot(TimerId::Hint, 1500);

        timers.poll(1000);
        assert!(queue_is_empty());
        timers.poll(1500);
        assert_eq!(pop_event(), Some(Event::HintTimeout));
        timers.poll(5000);
        assert!(queue_is_empty());
    }

    #[test]
    fn periodic_reschedules_and_cancel_stops_it() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();
        let mut timers = SimTimers::new();
        timers.start_periodic(TimerId::RuntimeTick, 1000);

        timers.poll(3200);
        let mut ticks = 0;
        while pop_event().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        timers.cancel(TimerId::RuntimeTick);
        timers.poll(10_000);
        assert!(queue_is_empty());
    }

    #[test]
    fn restart_replaces_the_previous_schedule() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();
        let mut timers = SimTimers::new();
        timers.start_oneshot(TimerId::RuntimeExpiry, 1000);
        timers.start_oneshot(TimerId::RuntimeExpiry, 5000);

        timers.poll(2000);
        assert!(queue_is_empty(), "first schedule replaced, not duplicated");
        timers.poll(5000);
        assert_eq!(pop_event(), Some(Event::RuntimeExpired));
    }
}
