//! Post lifecycle: create, list, show, update and delete, all scoped to the owner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    NewPost, Page, PageRequest, Post, PostChanges, PostFilter, PostStatus, PostWithPlatforms,
    dedup_ids, utc_day_range,
};
use crate::error::{DomainError, FieldErrors};
use crate::ports::{CreateResult, CreationQuota, PlatformRepository, PostRepository};

use super::activity::ActivityRecorder;
use super::check_platform_ids;
use super::policy::ensure_owner;

const SCHEDULED_IN_PAST: &str = "The scheduled time must be a date after or equal to now.";
const SCHEDULED_TIME_REQUIRED: &str = "The scheduled time field is required when status is scheduled.";

/// Tunables for the post service.
#[derive(Debug, Clone, Copy)]
pub struct PostSettings {
    /// Maximum posts a user may create per UTC calendar day.
    pub daily_limit: u64,
    /// Fixed listing page size.
    pub page_size: u64,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            daily_limit: 10,
            page_size: 10,
        }
    }
}

/// Scheduling rules for a new post evaluated at `now`.
pub fn check_new_post_schedule(new: &NewPost, now: DateTime<Utc>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match new.scheduled_time {
        Some(at) if at < now => errors.add("scheduled_time", SCHEDULED_IN_PAST),
        None if new.status == PostStatus::Scheduled => {
            errors.add("scheduled_time", SCHEDULED_TIME_REQUIRED)
        }
        _ => {}
    }
    errors
}

/// Scheduling rules for applying `changes` to `current` at `now`.
pub fn check_post_changes_schedule(
    current: &Post,
    changes: &PostChanges,
    now: DateTime<Utc>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(Some(at)) = changes.scheduled_time {
        if at < now {
            errors.add("scheduled_time", SCHEDULED_IN_PAST);
            return errors;
        }
    }

    let touches_schedule = changes.status.is_some() || changes.scheduled_time.is_some();
    let status = changes.status.unwrap_or(current.status);
    let scheduled_time = changes.scheduled_time.unwrap_or(current.scheduled_time);

    if touches_schedule && status == PostStatus::Scheduled {
        match scheduled_time {
            None => errors.add("scheduled_time", SCHEDULED_TIME_REQUIRED),
            Some(at) if at < now => errors.add("scheduled_time", SCHEDULED_IN_PAST),
            Some(_) => {}
        }
    }
    errors
}

/// Owner-scoped post operations.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    platforms: Arc<dyn PlatformRepository>,
    activity: ActivityRecorder,
    settings: PostSettings,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        platforms: Arc<dyn PlatformRepository>,
        activity: ActivityRecorder,
        settings: PostSettings,
    ) -> Self {
        Self {
            posts,
            platforms,
            activity,
            settings,
        }
    }

    /// Create a post with its platform associations, enforcing the daily quota.
    pub async fn create(
        &self,
        user_id: Uuid,
        mut new: NewPost,
    ) -> Result<PostWithPlatforms, DomainError> {
        let now = Utc::now();

        let mut errors = check_new_post_schedule(&new, now);
        match check_platform_ids(self.platforms.as_ref(), &new.platform_ids).await {
            Ok(()) => {}
            Err(DomainError::Validation(platform_errors)) => errors.merge(platform_errors),
            Err(e) => return Err(e),
        }
        errors.into_result()?;
        new.platform_ids = dedup_ids(&new.platform_ids);

        let (from, to) = utc_day_range(now.date_naive());
        let quota = CreationQuota {
            limit: self.settings.daily_limit,
            from,
            to,
        };
        let post = Post::new(user_id, &new);
        let created = match self.posts.create(post, &new.platform_ids, quota).await? {
            CreateResult::Created(created) => created,
            CreateResult::QuotaReached { created } => {
                tracing::info!(
                    user_id = %user_id,
                    created_today = created,
                    "Daily post limit reached"
                );
                return Err(DomainError::RateLimited(format!(
                    "You can only create {} posts per day.",
                    self.settings.daily_limit
                )));
            }
        };
        tracing::info!(post_id = %created.post.id, user_id = %user_id, status = %created.post.status, "Post created");

        self.activity
            .record(
                user_id,
                "post.created",
                json!({ "post_id": created.post.id, "platforms": created.platform_ids() }),
            )
            .await;

        Ok(created)
    }

    /// The caller's posts, newest first, one fixed-size page at a time.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &PostFilter,
        page: u64,
    ) -> Result<Page<PostWithPlatforms>, DomainError> {
        let request = PageRequest::new(page, self.settings.page_size);
        Ok(self.posts.list_for_user(user_id, filter, request).await?)
    }

    pub async fn show(&self, user_id: Uuid, id: Uuid) -> Result<PostWithPlatforms, DomainError> {
        let found = self.load(id).await?;
        ensure_owner(&found.post, user_id)?;
        Ok(found)
    }

    /// Apply a partial update. A supplied platform list fully resyncs the
    /// association set.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut changes: PostChanges,
    ) -> Result<PostWithPlatforms, DomainError> {
        let current = self.load(id).await?;
        ensure_owner(&current.post, user_id)?;

        let now = Utc::now();
        let mut errors = check_post_changes_schedule(&current.post, &changes, now);
        if let Some(ids) = changes.platform_ids.as_deref() {
            match check_platform_ids(self.platforms.as_ref(), ids).await {
                Ok(()) => {}
                Err(DomainError::Validation(platform_errors)) => errors.merge(platform_errors),
                Err(e) => return Err(e),
            }
        }
        errors.into_result()?;
        if let Some(ids) = changes.platform_ids.as_mut() {
            *ids = dedup_ids(ids);
        }

        let mut post = current.post;
        post.apply(&changes);
        let updated = self
            .posts
            .update(post, changes.platform_ids.as_deref())
            .await?;
        tracing::info!(post_id = %id, resynced = changes.platform_ids.is_some(), "Post updated");

        self.activity
            .record(
                user_id,
                "post.updated",
                json!({ "post_id": id, "platforms_resynced": changes.platform_ids.is_some() }),
            )
            .await;

        Ok(updated)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let current = self.load(id).await?;
        ensure_owner(&current.post, user_id)?;

        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post deleted");

        self.activity
            .record(user_id, "post.deleted", json!({ "post_id": id }))
            .await;
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<PostWithPlatforms, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }
}
