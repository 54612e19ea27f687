//! Application state - shared across all handlers and background jobs.

use std::sync::Arc;

use postly_core::domain::{Platform, PlatformType};
use postly_core::ports::{
    ActivityLogRepository, Cache, PasswordService, PlatformRepository, PostRepository,
    RateLimiter, TokenService, UserRepository,
};
use postly_core::services::{
    ActivityRecorder, AnalyticsService, PlatformService, PostService, ScheduledPublisher,
};
use postly_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryRateLimiter, InMemoryStore, JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub posts: PostService,
    pub platforms: PlatformService,
    pub analytics: AnalyticsService,
    pub publisher: Arc<ScheduledPublisher>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Revoked session ids, kept until the token would have expired anyway.
    pub sessions: Arc<dyn Cache>,
    pub auth_limiter: Arc<dyn RateLimiter>,
}

/// Failure to build the state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database connection failed: {0}")]
    Database(String),
    #[error("DATABASE_URL is set but the server was built without the postgres feature")]
    PostgresDisabled,
}

/// The platforms available when running without a database.
pub fn default_platforms() -> Vec<Platform> {
    vec![
        Platform::new("Facebook", PlatformType::Facebook),
        Platform::new("Twitter", PlatformType::Twitter),
        Platform::new("LinkedIn", PlatformType::Linkedin),
        Platform::new("Instagram", PlatformType::Instagram),
    ]
}

struct Stores {
    users: Arc<dyn UserRepository>,
    platforms: Arc<dyn PlatformRepository>,
    posts: Arc<dyn PostRepository>,
    activity: Arc<dyn ActivityLogRepository>,
}

impl AppState {
    /// Build the state, connecting to PostgreSQL when a database is configured.
    pub async fn new(config: AppConfig) -> Result<Self, StateError> {
        let stores = match &config.database {
            Some(settings) => Self::postgres_stores(settings).await?,
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Self::memory_stores()
            }
        };

        Ok(Self::assemble(config, stores))
    }

    /// State backed by a fresh in-memory store seeded with the default platforms.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::assemble(config, Self::memory_stores())
    }

    fn memory_stores() -> Stores {
        let store = Arc::new(InMemoryStore::with_platforms(default_platforms()));
        Stores {
            users: store.clone(),
            platforms: store.clone(),
            posts: store.clone(),
            activity: store,
        }
    }

    #[cfg(feature = "postgres")]
    async fn postgres_stores(
        settings: &crate::config::DatabaseSettings,
    ) -> Result<Stores, StateError> {
        use postly_infra::{
            DatabaseConfig, PostgresActivityLogRepository, PostgresPlatformRepository,
            PostgresPostRepository, PostgresUserRepository,
        };

        let db = postly_infra::connect(&DatabaseConfig {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
        })
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(Stores {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            platforms: Arc::new(PostgresPlatformRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            activity: Arc::new(PostgresActivityLogRepository::new(db)),
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn postgres_stores(
        _settings: &crate::config::DatabaseSettings,
    ) -> Result<Stores, StateError> {
        Err(StateError::PostgresDisabled)
    }

    fn assemble(config: AppConfig, stores: Stores) -> Self {
        let activity = ActivityRecorder::new(stores.activity);

        let posts = PostService::new(
            stores.posts.clone(),
            stores.platforms.clone(),
            activity.clone(),
            config.posts,
        );
        let platforms = PlatformService::new(
            stores.platforms,
            stores.users.clone(),
            activity,
            config.posts.page_size,
        );

        let state = Self {
            users: stores.users,
            posts,
            platforms,
            analytics: AnalyticsService::new(stores.posts.clone()),
            publisher: Arc::new(ScheduledPublisher::new(stores.posts)),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            sessions: Arc::new(InMemoryCache::new()),
            auth_limiter: Arc::new(InMemoryRateLimiter::new(config.auth_rate_limit.clone())),
            config: Arc::new(config),
        };

        tracing::info!("Application state initialized");
        state
    }
}
