//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - keypad GPIO ISRs (via the keypad driver's gesture classifier)
//! - timer callbacks (countdown tick, auto-off expiry, LED blink, hint)
//! - software (engine tick cadence on simulation targets)
//!
//! Events are consumed by the main control loop, which processes them one at
//! a time.  Timer callbacks never mutate application state directly — they
//! only push into this queue, and the main loop performs the state change.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Keypad ISR  │────▶│              │     │              │
//! │ Timer cb    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Software    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// Navigation keys on the front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Ok,
    Back,
}

/// Press classification produced by the keypad driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Short,
    Long,
    /// Auto-repeat while held (list scrolling).
    Repeat,
}

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One-shot runtime limit expired — auto-off must run.
    RuntimeExpired,
    /// 1 Hz countdown display tick.
    RuntimeTick,
    /// LED blink timer fired — toggle the indicator.
    LedToggle,
    /// Back-hint overlay timeout — clear the hint.
    HintTimeout,
    /// CF10B tool engine cadence tick (~20 ms).
    EngineTick,
    /// Classified key press from the keypad driver.
    Key { key: Key, press: Press },
}

// ── Packed wire encoding ──────────────────────────────────────
//
// The ring buffer stores single bytes so ISR producers never touch
// non-atomic multi-byte state.  Key events pack key and press class
// into one byte above the plain-event range.

const KEY_BASE: u8 = 32;

fn encode(event: Event) -> u8 {
    match event {
        Event::RuntimeExpired => 0,
        Event::RuntimeTick => 1,
        Event::LedToggle => 2,
        Event::HintTimeout => 3,
        Event::EngineTick => 4,
        Event::Key { key, press } => {
            let k = match key {
                Key::Up => 0u8,
                Key::Down => 1,
                Key::Ok => 2,
                Key::Back => 3,
            };
            let p = match press {
                Press::Short => 0u8,
                Press::Long => 1,
                Press::Repeat => 2,
            };
            KEY_BASE + k * 3 + p
        }
    }
}

fn decode(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::RuntimeExpired),
        1 => Some(Event::RuntimeTick),
        2 => Some(Event::LedToggle),
        3 => Some(Event::HintTimeout),
        4 => Some(Event::EngineTick),
        KEY_BASE..=43 => {
            let idx = raw - KEY_BASE;
            let key = match idx / 3 {
                0 => Key::Up,
                1 => Key::Down,
                2 => Key::Ok,
                _ => Key::Back,
            };
            let press = match idx % 3 {
                0 => Press::Short,
                1 => Press::Long,
                _ => Press::Repeat,
            };
            Some(Event::Key { key, press })
        }
        _ => None,
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs and timer callbacks write (produce), main loop reads (consume).
// Uses atomic head/tail indices.  The buffer is intentionally kept in
// a static so ISR callbacks can access it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER slots are written only by the producer side
// (push_event, ISR/timer context — one writer) and read only by the
// consumer side (pop_event, main-loop task — one reader).  The atomic
// head/tail indices enforce the SPSC discipline; a slot is never read
// before the Release store that published it.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR / timer-callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; see EVENT_BUFFER invariants above.
    unsafe {
        EVENT_BUFFER[head as usize] = encode(event);
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; slot was published by the Release store
    // in push_event.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    decode(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}
