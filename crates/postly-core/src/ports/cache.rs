//! Expiring key/value store. Holds revoked session ids.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. `None` keeps it until removed.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    async fn contains(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    /// Evict expired entries and report how many went. Stores that expire
    /// keys themselves can leave this as a no-op.
    async fn purge_expired(&self) -> usize {
        0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("cache unavailable: {0}")]
pub struct CacheError(pub String);
