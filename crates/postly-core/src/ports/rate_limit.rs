//! Request throttling.

use std::time::Duration;

/// Outcome of counting one request against a key's allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl Throttle {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Throttle::Allowed { .. })
    }
}

/// Counts hits per key. Implementations must not block the caller.
pub trait RateLimiter: Send + Sync {
    fn hit(&self, key: &str) -> Throttle;
}
