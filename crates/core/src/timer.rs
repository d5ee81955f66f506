//! High-resolution timer for frame timestamps.

use std::time::{Duration, Instant};

/// Monotonic clock handing out per-frame timestamps.
///
/// Timestamps are milliseconds since the timer was created, the same unit
/// the render loop feeds into the rotation helper.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the total elapsed time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Milliseconds since the timer was created, as a frame timestamp.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Reset the timer to the current time.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_ms_is_monotonic() {
        let timer = Timer::new();
        let a = timer.elapsed_ms();
        std::thread::sleep(Duration::from_millis(2));
        let b = timer.elapsed_ms();
        assert!(a >= 0.0);
        assert!(b >= a + 1.0);
    }

    #[test]
    fn test_reset_restarts_clock() {
        let mut timer = Timer::new();
        std::thread::sleep(Duration::from_millis(5));
        timer.reset();
        assert!(timer.elapsed() < Duration::from_millis(5));
    }
}
