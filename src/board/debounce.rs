use std::time::{Duration, Instant};

/// Holds back a resize until events have been quiet for a while, so a window
/// drag triggers one regeneration instead of one per event.
pub struct ResizeDebounce {
    quiet: Duration,
    pending: Option<((u32, u32), Instant)>,
}

impl ResizeDebounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record a new size and restart the quiet period
    pub fn note(&mut self, size: (u32, u32), now: Instant) {
        self.pending = Some((size, now));
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The latest size, once the quiet period has elapsed since it was noted
    pub fn poll(&mut self, now: Instant) -> Option<(u32, u32)> {
        match self.pending {
            Some((size, noted)) if now.saturating_duration_since(noted) >= self.quiet => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }
}
