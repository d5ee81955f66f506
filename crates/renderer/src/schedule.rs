//! Frame scheduling.

/// Asks the host to run the render loop once more.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// A scheduler driven by hand, counting outstanding requests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualScheduler {
    pending: usize,
    requested: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet taken.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Requests made over the scheduler's lifetime.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Consume one pending request. Returns `false` when none was pending.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.take());

        scheduler.request_frame();
        scheduler.request_frame();
        assert_eq!(scheduler.pending(), 2);
        assert!(scheduler.take());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.requested(), 2);
    }
}
