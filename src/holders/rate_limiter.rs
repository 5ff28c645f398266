/// Process-wide throttle for source chain passes
///
/// Keeps volatile sources (explorer pages behind anti-scraping defenses)
/// from being queried more often than `min_interval`. This is a best-effort
/// throttle: two callers racing through `should_attempt` may both proceed.
/// The limiter never blocks a caller, it only tells the orchestrator
/// whether a network pass is allowed.
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::time::Duration;

#[derive(Debug)]
pub struct AttemptRateLimiter {
    last_attempt_at: Mutex<Option<DateTime<Utc>>>,
    min_interval: ChronoDuration,
}

impl AttemptRateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_attempt_at: Mutex::new(None),
            min_interval: ChronoDuration::from_std(min_interval)
                .unwrap_or_else(|_| ChronoDuration::max_value()),
        }
    }

    /// True iff no attempt was recorded or the last one is older than `min_interval`
    pub fn should_attempt(&self, now: DateTime<Utc>) -> bool {
        match *self.last_attempt_at.lock() {
            None => true,
            Some(last) => now.signed_duration_since(last) > self.min_interval,
        }
    }

    /// Record an attempt, successful or not
    pub fn record_attempt(&self, now: DateTime<Utc>) {
        *self.last_attempt_at.lock() = Some(now);
    }

    /// Check and record under one lock; returns whether the caller may proceed
    pub fn try_begin(&self, now: DateTime<Utc>) -> bool {
        let mut last = self.last_attempt_at.lock();
        let allowed = match *last {
            None => true,
            Some(prev) => now.signed_duration_since(prev) > self.min_interval,
        };
        if allowed {
            *last = Some(now);
        }
        allowed
    }

    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        *self.last_attempt_at.lock()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval.to_std().unwrap_or(Duration::MAX)
    }

    /// Time left before the next pass is allowed
    pub fn time_until_next(&self, now: DateTime<Utc>) -> Duration {
        match *self.last_attempt_at.lock() {
            None => Duration::ZERO,
            Some(last) => match last.checked_add_signed(self.min_interval) {
                Some(ready_at) => (ready_at - now).to_std().unwrap_or(Duration::ZERO),
                None => Duration::MAX,
            },
        }
    }
}
