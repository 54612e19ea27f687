//! In-memory keyed rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::{DefaultKeyedRateLimiter, Quota};

use postly_core::ports::{RateLimiter, Throttle};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window, per key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("AUTH_RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

/// GCRA limiter keyed by caller. Each process counts on its own.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String, StateInformationMiddleware>,
    clock: DefaultClock,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let max_requests = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = (config.window / max_requests.get()).max(Duration::from_nanos(1));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(max_requests))
            .allow_burst(max_requests);

        Self {
            limiter: governor::RateLimiter::keyed(quota)
                .with_middleware::<StateInformationMiddleware>(),
            clock: DefaultClock::default(),
        }
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn hit(&self, key: &str) -> Throttle {
        match self.limiter.check_key(&key.to_string()) {
            Ok(snapshot) => Throttle::Allowed {
                remaining: snapshot.remaining_burst_capacity(),
            },
            Err(not_until) => Throttle::Limited {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })
    }

    #[test]
    fn burst_is_spent_then_refused() {
        let limiter = limiter(3);

        for _ in 0..3 {
            assert!(limiter.hit("10.0.0.1").is_allowed());
        }

        match limiter.hit("10.0.0.1") {
            Throttle::Limited { retry_after } => assert!(retry_after > Duration::ZERO),
            other => panic!("expected a refusal, got {other:?}"),
        }
    }

    #[test]
    fn keys_do_not_share_a_budget() {
        let limiter = limiter(1);

        assert!(limiter.hit("10.0.0.1").is_allowed());
        assert!(!limiter.hit("10.0.0.1").is_allowed());
        assert!(limiter.hit("10.0.0.2").is_allowed());
    }

    #[test]
    fn zero_is_treated_as_one() {
        let limiter = limiter(0);

        assert!(limiter.hit("k").is_allowed());
        assert!(!limiter.hit("k").is_allowed());
    }
}
