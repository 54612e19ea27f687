//! Adapters behind the `postly-core` ports.
//!
//! The in-memory store and cache always build, so tests and `minimal`
//! builds need no database. Cargo features switch on the rest:
//! `postgres` (SeaORM repositories), `auth` (HS256 tokens and Argon2id
//! hashes) and `rate-limit` (governor). `full`, the default, turns on all three.

pub mod cache;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use cache::InMemoryCache;
pub use database::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresActivityLogRepository, PostgresPlatformRepository,
    PostgresPostRepository, PostgresUserRepository, connect,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
