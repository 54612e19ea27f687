use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ActivityLog, Page, PageRequest, Platform, Post, PostFilter, PostWithPlatforms, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// The user's active platform preference set.
    async fn active_platforms(&self, user_id: Uuid) -> Result<Vec<Platform>, RepoError>;

    /// Replace the user's active platform set wholesale.
    async fn replace_active_platforms(
        &self,
        user_id: Uuid,
        platform_ids: &[Uuid],
    ) -> Result<(), RepoError>;
}

/// Platform registry.
#[async_trait]
pub trait PlatformRepository: BaseRepository<Platform, Uuid> {
    /// Page through all platforms, ordered by name.
    async fn list(&self, page: PageRequest) -> Result<Page<Platform>, RepoError>;

    /// Fetch every platform whose id is in `ids`; missing ids are simply absent.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Platform>, RepoError>;
}

/// Upper bound on the posts one user may create inside `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationQuota {
    pub limit: u64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug)]
pub enum CreateResult {
    Created(PostWithPlatforms),
    /// Nothing was written; the owner already has `created` posts in the window.
    QuotaReached { created: u64 },
}

/// Outcome of promoting one post during a publish sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishResult {
    /// The post and this many associations were flipped to published.
    Published { associations: u64 },
    /// The post was no longer scheduled (or no longer exists) when the write ran.
    Skipped,
}

/// Post store. Every write that touches a post and its associations runs in
/// a single transaction so both change together or not at all.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a post and one `pending` association per platform id, unless
    /// the owner already created `quota.limit` posts inside the quota window.
    /// The count and the insert happen atomically.
    async fn create(
        &self,
        post: Post,
        platform_ids: &[Uuid],
        quota: CreationQuota,
    ) -> Result<CreateResult, RepoError>;

    /// Find a post with its platforms.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithPlatforms>, RepoError>;

    /// Persist updated post fields; when `platform_ids` is given, replace every
    /// association with a fresh `pending` one per id.
    async fn update(
        &self,
        post: Post,
        platform_ids: Option<&[Uuid]>,
    ) -> Result<PostWithPlatforms, RepoError>;

    /// Delete a post and its associations.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// A user's posts, newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostWithPlatforms>, RepoError>;

    /// Every post a user owns, with platforms.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<PostWithPlatforms>, RepoError>;

    /// Posts with status `scheduled` and `scheduled_time <= now`.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<PostWithPlatforms>, RepoError>;

    /// Flip a still-scheduled post and all of its associations to published.
    async fn publish(&self, id: Uuid, now: DateTime<Utc>) -> Result<PublishResult, RepoError>;
}

/// Audit trail of user actions.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn record(&self, entry: ActivityLog) -> Result<(), RepoError>;

    /// Most recent entries for a user, newest first.
    async fn recent_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ActivityLog>, RepoError>;
}
