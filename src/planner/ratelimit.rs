//! A dedicated, concurrency-safe rate limiter owned by a single external
//! collaborator (redesign: the source keyed rate limiting off a
//! module-level mutable timestamp).

use std::num::NonZeroU32;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};

/// Caps outgoing requests to a fixed rate per second.
///
/// One instance is owned by exactly one collaborator (e.g. the geocoder);
/// it is safe to share across concurrent callers via `Arc`.
pub struct RateLimiter {
    inner: GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl RateLimiter {
    /// Builds a limiter allowing `requests_per_sec` requests per second.
    ///
    /// # Panics
    ///
    /// Panics if `requests_per_sec` is `0`.
    pub fn new(requests_per_sec: u32) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_sec).expect("rate limit must be >= 1"),
        );
        Self {
            inner: GovernorRateLimiter::direct(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Waits until a request slot is available under the configured rate.
    pub async fn acquire(&self) {
        loop {
            match self.inner.check() {
                Ok(()) => return,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(self.clock.now());
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[tokio::test]
    async fn first_request_does_not_wait() {
        let limiter = RateLimiter::new(1);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_immediate_request_is_delayed_to_the_next_second() {
        let limiter = RateLimiter::new(1);
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[test]
    #[should_panic(expected = "rate limit must be >= 1")]
    fn zero_rate_limit_panics() {
        RateLimiter::new(0);
    }
}
