//! Cooperative wall-clock budget

use std::time::{Duration, Instant};

/// Deadline polled by the search once per iteration
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    start: Instant,
    max_duration: Option<Duration>,
}

impl Timeout {
    /// A timeout that never expires
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            max_duration: None,
        }
    }

    /// Expire once `max_duration` has elapsed from now
    ///
    /// A zero duration is expired immediately.
    pub fn new(max_duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            max_duration: Some(max_duration),
        }
    }

    pub(crate) fn from_option(max_duration: Option<Duration>) -> Self {
        max_duration.map_or_else(Self::unbounded, Self::new)
    }

    /// Has the budget run out?
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.max_duration
            .is_some_and(|max| self.start.elapsed() >= max)
    }

    /// Time since the timeout was started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Configured budget, if any
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::unbounded()
    }
}
