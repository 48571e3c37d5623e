//! Resize debounce.
//!
//! Viewport resizes arrive in bursts. The builder only runs its resize
//! fan-out once the viewport has been quiet for the configured window.
//! Time is passed in by the caller, nothing here reads the clock.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Default quiet period before a resize is delivered.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct ResizeDebouncer {
    quiet: Duration,
    pending_since: Cell<Option<Instant>>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending_since: Cell::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a raw resize notification. Restarts the quiet window.
    pub fn notify(&self, now: Instant) {
        self.pending_since.set(Some(now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.get().is_some()
    }

    /// True exactly once per burst, when the quiet window has elapsed.
    pub fn poll(&self, now: Instant) -> bool {
        match self.pending_since.get() {
            Some(since) if now.saturating_duration_since(since) >= self.quiet => {
                self.pending_since.set(None);
                true
            }
            _ => false,
        }
    }
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}
