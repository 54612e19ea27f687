//! PostgreSQL repository implementations for users, platforms and the activity log.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use postly_core::domain::{ActivityLog, Page, PageRequest, Platform, User};
use postly_core::error::RepoError;
use postly_core::ports::{ActivityLogRepository, PlatformRepository, UserRepository};

use super::entity::activity_log::{self, Entity as ActivityLogEntity};
use super::entity::platform::{self, Entity as PlatformEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_platform::{self, Entity as UserPlatformEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL platform repository.
pub type PostgresPlatformRepository = PostgresBaseRepository<PlatformEntity>;

/// PostgreSQL activity log repository.
pub type PostgresActivityLogRepository = PostgresBaseRepository<ActivityLogEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().filter(|_| local.chars().count() > 1);
            match head {
                Some(c) => format!("{c}***@{domain}"),
                None => format!("***@{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn active_platforms(&self, user_id: Uuid) -> Result<Vec<Platform>, RepoError> {
        let rows = UserPlatformEntity::find()
            .filter(user_platform::Column::UserId.eq(user_id))
            .find_also_related(PlatformEntity)
            .order_by_asc(platform::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, platform)| platform.map(Into::into))
            .collect())
    }

    async fn replace_active_platforms(
        &self,
        user_id: Uuid,
        platform_ids: &[Uuid],
    ) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        UserPlatformEntity::delete_many()
            .filter(user_platform::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if !platform_ids.is_empty() {
            let now = Utc::now();
            let rows = platform_ids.iter().map(|platform_id| user_platform::ActiveModel {
                user_id: Set(user_id),
                platform_id: Set(*platform_id),
                created_at: Set(now.into()),
            });
            UserPlatformEntity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl PlatformRepository for PostgresPlatformRepository {
    async fn list(&self, page: PageRequest) -> Result<Page<Platform>, RepoError> {
        let paginator = PlatformEntity::find()
            .order_by_asc(platform::Column::Name)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator.fetch_page(page.page.saturating_sub(1)).await.map_err(db_err)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            page,
            total,
        ))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Platform>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = PlatformEntity::find()
            .filter(platform::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLogRepository {
    async fn record(&self, entry: ActivityLog) -> Result<(), RepoError> {
        ActivityLogEntity::insert(activity_log::ActiveModel::from(entry))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ActivityLog>, RepoError> {
        let models = ActivityLogEntity::find()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_desc(activity_log::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
