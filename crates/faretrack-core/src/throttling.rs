//! Rate limiting for outbound provider calls.
//!
//! The Amadeus test environment enforces per-second request quotas; the
//! gateway consults a [`ProviderThrottle`] before every upstream call and
//! surfaces quota exhaustion as a rate-limited gateway error instead of
//! letting the provider reject the request.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// In-memory quota gate for a single provider.
#[derive(Clone)]
pub struct ProviderThrottle {
    limiter: Arc<DirectRateLimiter>,
    quota_window: Duration,
}

impl ProviderThrottle {
    /// Allow at most `quota_limit` calls per `quota_window`.
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
            quota_window,
        }
    }

    /// Tries to acquire rate budget. When budget is unavailable the caller
    /// receives the window to wait before trying again; the core defines no
    /// retry loop, so the delay is informational.
    pub fn acquire(&self) -> Result<(), Duration> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }
        Err(self.quota_window)
    }
}

impl Default for ProviderThrottle {
    fn default() -> Self {
        // Amadeus self-service test tier allows 10 transactions per second.
        Self::new(Duration::from_secs(1), 10)
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}
