//! PostgreSQL post repository.
//!
//! A post and its platform associations always change inside one transaction.
//! Publishing is a conditional update, so a post that was edited or deleted
//! after the due query ran is skipped rather than overwritten.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use postly_core::domain::{
    Page, PageRequest, Post, PostFilter, PostPlatform, PostWithPlatforms, utc_day_range,
};
use postly_core::error::RepoError;
use postly_core::ports::{CreateResult, CreationQuota, PostRepository, PublishResult};

use super::entity::platform::{self, Entity as PlatformEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_platform::{self, Entity as PostPlatformEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::db_err;

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn tz(at: DateTime<Utc>) -> DateTimeWithTimeZone {
    at.into()
}

/// Load the platforms of every post in `post_ids`, keyed by post id.
async fn load_platforms<C: ConnectionTrait>(
    db: &C,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<PostPlatform>>, RepoError> {
    let mut by_post: HashMap<Uuid, Vec<PostPlatform>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(by_post);
    }

    let rows = PostPlatformEntity::find()
        .filter(post_platform::Column::PostId.is_in(post_ids.iter().copied()))
        .find_also_related(PlatformEntity)
        .order_by_asc(platform::Column::Name)
        .all(db)
        .await
        .map_err(db_err)?;

    for (edge, platform) in rows {
        if let Some(platform) = platform {
            by_post.entry(edge.post_id).or_default().push(PostPlatform {
                platform: platform.into(),
                platform_status: edge.platform_status.into(),
            });
        }
    }

    Ok(by_post)
}

async fn with_platforms<C: ConnectionTrait>(
    db: &C,
    models: Vec<post::Model>,
) -> Result<Vec<PostWithPlatforms>, RepoError> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut platforms = load_platforms(db, &ids).await?;

    Ok(models
        .into_iter()
        .map(|model| PostWithPlatforms {
            platforms: platforms.remove(&model.id).unwrap_or_default(),
            post: model.into(),
        })
        .collect())
}

/// Insert one `pending` association per platform id.
async fn attach<C: ConnectionTrait>(
    db: &C,
    post_id: Uuid,
    platform_ids: &[Uuid],
    now: DateTime<Utc>,
) -> Result<(), RepoError> {
    if platform_ids.is_empty() {
        return Ok(());
    }

    let rows = platform_ids.iter().map(|platform_id| post_platform::ActiveModel {
        post_id: Set(post_id),
        platform_id: Set(*platform_id),
        platform_status: Set(post_platform::PlatformStatus::Pending),
        created_at: Set(tz(now)),
        updated_at: Set(tz(now)),
    });

    PostPlatformEntity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn detach_all<C: ConnectionTrait>(db: &C, post_id: Uuid) -> Result<(), RepoError> {
    PostPlatformEntity::delete_many()
        .filter(post_platform::Column::PostId.eq(post_id))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn count_created<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    quota: &CreationQuota,
) -> Result<u64, RepoError> {
    PostEntity::find()
        .filter(post::Column::UserId.eq(user_id))
        .filter(post::Column::CreatedAt.gte(tz(quota.from)))
        .filter(post::Column::CreatedAt.lt(tz(quota.to)))
        .count(db)
        .await
        .map_err(db_err)
}

impl PostgresPostRepository {
    async fn load(&self, id: Uuid) -> Result<PostWithPlatforms, RepoError> {
        self.find_by_id(id).await?.ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(
        &self,
        post: Post,
        platform_ids: &[Uuid],
        quota: CreationQuota,
    ) -> Result<CreateResult, RepoError> {
        let id = post.id;
        let now = post.created_at;

        let txn = self.db.begin().await.map_err(db_err)?;
        // Serialises concurrent creates by the same owner until commit.
        UserEntity::find_by_id(post.user_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?;
        let created = count_created(&txn, post.user_id, &quota).await?;
        if created >= quota.limit {
            txn.rollback().await.map_err(db_err)?;
            return Ok(CreateResult::QuotaReached { created });
        }

        post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(db_err)?;
        attach(&txn, id, platform_ids, now).await?;
        txn.commit().await.map_err(db_err)?;

        self.load(id).await.map(CreateResult::Created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithPlatforms>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        Ok(with_platforms(&self.db, vec![model]).await?.pop())
    }

    async fn update(
        &self,
        post: Post,
        platform_ids: Option<&[Uuid]>,
    ) -> Result<PostWithPlatforms, RepoError> {
        let id = post.id;
        let now = post.updated_at;

        let txn = self.db.begin().await.map_err(db_err)?;
        post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(db_err)?;
        if let Some(ids) = platform_ids {
            detach_all(&txn, id).await?;
            attach(&txn, id, ids, now).await?;
        }
        txn.commit().await.map_err(db_err)?;

        self.load(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        detach_all(&txn, id).await?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostWithPlatforms>, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::UserId.eq(user_id));

        if let Some(status) = filter.status {
            query = query.filter(post::Column::Status.eq(post::PostStatus::from(status)));
        }
        if let Some(date) = filter.scheduled_on {
            let (start, end) = utc_day_range(date);
            query = query
                .filter(post::Column::ScheduledTime.gte(tz(start)))
                .filter(post::Column::ScheduledTime.lt(tz(end)));
        }

        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator.fetch_page(page.page.saturating_sub(1)).await.map_err(db_err)?;

        Ok(Page::new(with_platforms(&self.db, models).await?, page, total))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<PostWithPlatforms>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        with_platforms(&self.db, models).await
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<PostWithPlatforms>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::Status.eq(post::PostStatus::Scheduled))
            .filter(post::Column::ScheduledTime.lte(tz(now)))
            .order_by_asc(post::Column::ScheduledTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        with_platforms(&self.db, models).await
    }

    async fn publish(&self, id: Uuid, now: DateTime<Utc>) -> Result<PublishResult, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let promoted = PostEntity::update_many()
            .set(post::ActiveModel {
                status: Set(post::PostStatus::Published),
                updated_at: Set(tz(now)),
                ..Default::default()
            })
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::Status.eq(post::PostStatus::Scheduled))
            .filter(post::Column::ScheduledTime.lte(tz(now)))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if promoted.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Ok(PublishResult::Skipped);
        }

        let edges = PostPlatformEntity::update_many()
            .set(post_platform::ActiveModel {
                platform_status: Set(post_platform::PlatformStatus::Published),
                updated_at: Set(tz(now)),
                ..Default::default()
            })
            .filter(post_platform::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(PublishResult::Published {
            associations: edges.rows_affected,
        })
    }
}
