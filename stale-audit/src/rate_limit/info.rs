//! Rate limit information.

use std::time::Duration;

/// Rate limit information for a specific resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// How long to pause before issuing more requests, if at all.
    ///
    /// Returns `None` while at least `min_remaining` requests are left or once
    /// the reset time has passed. The wait is capped at `max_wait`.
    #[must_use]
    pub fn wait_duration(
        &self,
        now: u64,
        min_remaining: u32,
        max_wait: Duration,
    ) -> Option<Duration> {
        if self.remaining >= min_remaining || self.reset <= now {
            return None;
        }

        Some(Duration::from_secs(self.reset - now).min(max_wait))
    }
}
