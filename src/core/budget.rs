//! Search budgets: wall-clock deadlines and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation flag shared between a caller and a search.
///
/// Cloning shares the flag. Searches poll it between iteration blocks and
/// return the best result found so far once it is set.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Clear a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Wall-clock deadline computed once per search call.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `limit` from now, or none.
    #[must_use]
    pub fn after(limit: Option<Duration>) -> Self {
        let start = Instant::now();
        Self {
            start,
            at: limit.map(|d| start + d),
        }
    }

    /// No time limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::after(None)
    }

    /// Has the deadline passed?
    #[inline]
    #[must_use]
    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time since the deadline was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Should the search stop (deadline passed or cancelled)?
    #[inline]
    #[must_use]
    pub fn should_stop(&self, cancel: &CancelToken) -> bool {
        cancel.is_cancelled() || self.expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());

        token.reset();
        assert!(!clone.is_cancelled());
    }

    #[test]
    fn test_unbounded_never_expires() {
        let deadline = Deadline::unbounded();
        assert!(!deadline.expired());
        assert!(!deadline.should_stop(&CancelToken::new()));
    }

    #[test]
    fn test_zero_deadline_expires() {
        let deadline = Deadline::after(Some(Duration::ZERO));
        assert!(deadline.expired());
    }

    #[test]
    fn test_cancel_stops_unbounded() {
        let deadline = Deadline::unbounded();
        let token = CancelToken::new();
        token.cancel();
        assert!(deadline.should_stop(&token));
    }
}
