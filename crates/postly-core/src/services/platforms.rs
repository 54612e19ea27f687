//! Platform registry reads, admin mutations, and user active-platform preferences.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Platform, PlatformType, dedup_ids};
use crate::error::DomainError;
use crate::ports::{PlatformRepository, UserRepository};

use super::activity::ActivityRecorder;
use super::check_platform_ids;

#[derive(Clone)]
pub struct PlatformService {
    platforms: Arc<dyn PlatformRepository>,
    users: Arc<dyn UserRepository>,
    activity: ActivityRecorder,
    page_size: u64,
}

impl PlatformService {
    pub fn new(
        platforms: Arc<dyn PlatformRepository>,
        users: Arc<dyn UserRepository>,
        activity: ActivityRecorder,
        page_size: u64,
    ) -> Self {
        Self {
            platforms,
            users,
            activity,
            page_size,
        }
    }

    pub async fn list(&self, page: u64) -> Result<Page<Platform>, DomainError> {
        Ok(self
            .platforms
            .list(PageRequest::new(page, self.page_size))
            .await?)
    }

    pub async fn show(&self, id: Uuid) -> Result<Platform, DomainError> {
        self.platforms
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Platform", id))
    }

    pub async fn active_for_user(&self, user_id: Uuid) -> Result<Vec<Platform>, DomainError> {
        Ok(self.users.active_platforms(user_id).await?)
    }

    /// Replace the user's active platform set with exactly `ids`.
    pub async fn set_active_for_user(
        &self,
        user_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Platform>, DomainError> {
        check_platform_ids(self.platforms.as_ref(), ids).await?;
        let ids = dedup_ids(ids);

        self.users.replace_active_platforms(user_id, &ids).await?;
        tracing::info!(user_id = %user_id, count = ids.len(), "Active platforms replaced");

        self.activity
            .record(user_id, "platforms.toggled", json!({ "platforms": ids }))
            .await;

        Ok(self.users.active_platforms(user_id).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: String,
        platform_type: PlatformType,
    ) -> Result<Platform, DomainError> {
        let mut platform = self.show(id).await?;
        platform.name = name;
        platform.platform_type = platform_type;
        platform.updated_at = Utc::now();

        let saved = self.platforms.save(platform).await?;
        tracing::info!(platform_id = %id, platform_type = %saved.platform_type, "Platform updated");
        Ok(saved)
    }

    /// Remove a platform along with its post associations and user preferences.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.show(id).await?;
        self.platforms.delete(id).await?;
        tracing::info!(platform_id = %id, "Platform deleted");
        Ok(())
    }
}
