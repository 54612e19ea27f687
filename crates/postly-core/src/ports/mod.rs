//! Seams between the services and whatever stores, signs or throttles for
//! them. Implementations live in `postly-infra`.

mod auth;
mod cache;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use rate_limit::{RateLimiter, Throttle};
pub use repository::{
    ActivityLogRepository, BaseRepository, CreateResult, CreationQuota, PlatformRepository,
    PostRepository, PublishResult, UserRepository,
};
