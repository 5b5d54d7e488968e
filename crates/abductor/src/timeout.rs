//! Wall-clock limits for pipeline stages

use std::time::{Duration, Instant};

/// A deadline started at construction. An unlimited timeout never expires.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    start: Instant,
    limit: Option<Duration>,
}

impl Timeout {
    pub fn new(limit: Option<Duration>) -> Self {
        Timeout {
            start: Instant::now(),
            limit,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn has_timed_out(&self) -> bool {
        match self.limit {
            Some(limit) => self.start.elapsed() > limit,
            None => false,
        }
    }

    /// Time left before expiry; `None` when unlimited
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|l| l.saturating_sub(self.start.elapsed()))
    }

    /// The tighter of this timeout and `other`, measured from now
    pub fn min(&self, other: Option<Duration>) -> Timeout {
        let limit = match (self.remaining(), other) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Timeout::new(limit)
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::unlimited()
    }
}
