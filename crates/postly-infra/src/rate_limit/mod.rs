//! Per-client request budgets (feature `rate-limit`).

mod memory;

pub use memory::{InMemoryRateLimiter, RateLimitConfig};
