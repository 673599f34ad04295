//! Fixed-window request limiter.
//!
//! The server allows `requests` uploads per `window`. All permits come back at
//! once when the window expires; nothing trickles in between. A returned wait
//! does not reserve a permit, so callers check in again after sleeping.

use std::time::Duration;
use tokio::time::Instant;

/// Permits per window. Defaults to 40 requests per 60 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub requests: u32,
    pub window: Duration,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            requests: 40,
            window: Duration::from_secs(60),
        }
    }
}

/// Fixed-window limiter state.
///
/// Invariant: `available <= capacity`. A reset sets `available = capacity`
/// and `window_start = now`.
#[derive(Debug, Clone)]
pub struct FixedWindowLimiter {
    capacity: u32,
    window: Duration,
    available: u32,
    window_start: Instant,
}

impl FixedWindowLimiter {
    /// Create a limiter whose first window starts now, with a full set of permits.
    pub fn new(policy: RatePolicy) -> Self {
        Self::new_at(policy, Instant::now())
    }

    /// Like `new` but with an explicit window start.
    pub fn new_at(policy: RatePolicy, now: Instant) -> Self {
        let capacity = policy.requests.max(1);
        Self {
            capacity,
            window: policy.window,
            available: capacity,
            window_start: now,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Permits left in the current window (as of the last check-in).
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Take a permit if one is available. Returns `Duration::ZERO` when granted,
    /// otherwise the time until the current window resets.
    pub fn check_in(&mut self) -> Duration {
        self.check_in_at(Instant::now())
    }

    /// `check_in` against an explicit clock reading.
    pub fn check_in_at(&mut self, now: Instant) -> Duration {
        if now.saturating_duration_since(self.window_start) >= self.window {
            self.available = self.capacity;
            self.window_start = now;
        }

        if self.available > 0 {
            self.available -= 1;
            return Duration::ZERO;
        }

        (self.window_start + self.window).saturating_duration_since(now)
    }
}
