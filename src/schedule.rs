use std::time::{Duration, Instant};

/// A repeating deadline driven by the caller's clock.
///
/// Nothing runs in the background: the owner checks [`Interval::fire`] from
/// its own loop, and a cancelled interval never fires again.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    last: Instant,
    cancelled: bool,
}

impl Interval {
    pub fn new(period: Duration, now: Instant) -> Self {
        Interval {
            period,
            last: now,
            cancelled: false,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        !self.cancelled && now.saturating_duration_since(self.last) >= self.period
    }

    /// Returns true at most once per period and restarts the period.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last = now;
        true
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.period
            .saturating_sub(now.saturating_duration_since(self.last))
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
