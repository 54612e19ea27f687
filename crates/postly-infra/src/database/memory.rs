//! In-memory store implementing every repository port.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. Each
//! operation holds the write lock for its whole duration, which gives the
//! same all-or-nothing behaviour as a database transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use postly_core::domain::{
    ActivityLog, Page, PageRequest, Platform, PlatformStatus, Post, PostFilter, PostPlatform,
    PostStatus, PostWithPlatforms, User,
};
use postly_core::error::RepoError;
use postly_core::ports::{
    ActivityLogRepository, BaseRepository, CreateResult, CreationQuota, PlatformRepository,
    PostRepository, PublishResult, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    platforms: HashMap<Uuid, Platform>,
    user_platforms: HashMap<Uuid, Vec<Uuid>>,
    posts: HashMap<Uuid, Post>,
    /// post id -> (platform id, edge status)
    post_platforms: HashMap<Uuid, Vec<(Uuid, PlatformStatus)>>,
    activity: Vec<ActivityLog>,
}

impl Tables {
    fn hydrate(&self, post: &Post) -> PostWithPlatforms {
        let mut platforms: Vec<PostPlatform> = self
            .post_platforms
            .get(&post.id)
            .into_iter()
            .flatten()
            .filter_map(|(platform_id, status)| {
                self.platforms.get(platform_id).map(|p| PostPlatform {
                    platform: p.clone(),
                    platform_status: *status,
                })
            })
            .collect();
        platforms.sort_by(|a, b| a.platform.name.cmp(&b.platform.name));

        PostWithPlatforms {
            post: post.clone(),
            platforms,
        }
    }

    fn attach(&mut self, post_id: Uuid, platform_ids: &[Uuid]) -> Result<(), RepoError> {
        if let Some(missing) = platform_ids.iter().find(|id| !self.platforms.contains_key(id)) {
            return Err(RepoError::Constraint(format!("platform {missing} does not exist")));
        }
        self.post_platforms.insert(
            post_id,
            platform_ids
                .iter()
                .map(|id| (*id, PlatformStatus::Pending))
                .collect(),
        );
        Ok(())
    }

    /// Posts of one user, newest first.
    fn posts_of(&self, user_id: Uuid) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    fn created_in(&self, user_id: Uuid, quota: &CreationQuota) -> u64 {
        self.posts
            .values()
            .filter(|p| p.user_id == user_id)
            .filter(|p| p.created_at >= quota.from && p.created_at < quota.to)
            .count() as u64
    }
}

/// Process-local store. Contents do not survive a restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given platforms already registered.
    pub fn with_platforms(platforms: impl IntoIterator<Item = Platform>) -> Self {
        let tables = Tables {
            platforms: platforms.into_iter().map(|p| (p.id, p)).collect(),
            ..Default::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email);
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.posts.remove(&post_id);
            tables.post_platforms.remove(&post_id);
        }
        tables.user_platforms.remove(&id);
        tables.activity.retain(|a| a.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn active_platforms(&self, user_id: Uuid) -> Result<Vec<Platform>, RepoError> {
        let tables = self.tables.read().await;
        let mut platforms: Vec<Platform> = tables
            .user_platforms
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.platforms.get(id).cloned())
            .collect();
        platforms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(platforms)
    }

    async fn replace_active_platforms(
        &self,
        user_id: Uuid,
        platform_ids: &[Uuid],
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = platform_ids.iter().find(|id| !tables.platforms.contains_key(id)) {
            return Err(RepoError::Constraint(format!("platform {missing} does not exist")));
        }
        tables.user_platforms.insert(user_id, platform_ids.to_vec());
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Platform, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Platform>, RepoError> {
        Ok(self.tables.read().await.platforms.get(&id).cloned())
    }

    async fn save(&self, platform: Platform) -> Result<Platform, RepoError> {
        self.tables
            .write()
            .await
            .platforms
            .insert(platform.id, platform.clone());
        Ok(platform)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.platforms.remove(&id).ok_or(RepoError::NotFound)?;
        for edges in tables.post_platforms.values_mut() {
            edges.retain(|(platform_id, _)| *platform_id != id);
        }
        for active in tables.user_platforms.values_mut() {
            active.retain(|platform_id| *platform_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Page<Platform>, RepoError> {
        let tables = self.tables.read().await;
        let mut all: Vec<Platform> = tables.platforms.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(Page::from_vec(all, page))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Platform>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.platforms.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(
        &self,
        post: Post,
        platform_ids: &[Uuid],
        quota: CreationQuota,
    ) -> Result<CreateResult, RepoError> {
        let mut tables = self.tables.write().await;
        let created = tables.created_in(post.user_id, &quota);
        if created >= quota.limit {
            return Ok(CreateResult::QuotaReached { created });
        }
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.attach(post.id, platform_ids)?;
        tables.posts.insert(post.id, post.clone());
        Ok(CreateResult::Created(tables.hydrate(&post)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithPlatforms>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.hydrate(p)))
    }

    async fn update(
        &self,
        post: Post,
        platform_ids: Option<&[Uuid]>,
    ) -> Result<PostWithPlatforms, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(ids) = platform_ids {
            tables.attach(post.id, ids)?;
        }
        tables.posts.insert(post.id, post.clone());
        Ok(tables.hydrate(&post))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.post_platforms.remove(&id);
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostWithPlatforms>, RepoError> {
        let tables = self.tables.read().await;
        let matching: Vec<PostWithPlatforms> = tables
            .posts_of(user_id)
            .into_iter()
            .filter(|p| filter.matches(p))
            .map(|p| tables.hydrate(p))
            .collect();
        Ok(Page::from_vec(matching, page))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<PostWithPlatforms>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts_of(user_id)
            .into_iter()
            .map(|p| tables.hydrate(p))
            .collect())
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<PostWithPlatforms>, RepoError> {
        let tables = self.tables.read().await;
        let mut due: Vec<&Post> = tables.posts.values().filter(|p| p.is_due(now)).collect();
        due.sort_by_key(|p| (p.scheduled_time, p.id));
        Ok(due.into_iter().map(|p| tables.hydrate(p)).collect())
    }

    async fn publish(&self, id: Uuid, now: DateTime<Utc>) -> Result<PublishResult, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id).filter(|p| p.is_due(now)) else {
            return Ok(PublishResult::Skipped);
        };
        post.status = PostStatus::Published;
        post.updated_at = now;

        let mut associations = 0;
        if let Some(edges) = tables.post_platforms.get_mut(&id) {
            for (_, status) in edges.iter_mut() {
                *status = PlatformStatus::Published;
                associations += 1;
            }
        }
        Ok(PublishResult::Published { associations })
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryStore {
    async fn record(&self, entry: ActivityLog) -> Result<(), RepoError> {
        self.tables.write().await.activity.push(entry);
        Ok(())
    }

    async fn recent_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ActivityLog>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .activity
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
