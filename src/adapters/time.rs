//! Monotonic time adapter.
//!
//! - **espidf** — wraps `esp_timer_get_time()` (microsecond, monotonic).
//! - **host** — `std::time::Instant` for tests and simulation.

/// Monotonic uptime source.
pub struct Uptime {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot.  Wraps after ~49 days, which every consumer
    /// handles with wrapping subtraction.
    #[cfg(feature = "espidf")]
    pub fn now_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    /// Milliseconds since boot.
    #[cfg(not(feature = "espidf"))]
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}
