#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use postly_core::domain::{NewPost, Platform, PlatformType, Post, PostStatus, PostWithPlatforms};
use postly_core::ports::{CreateResult, CreationQuota, PostRepository};
use postly_core::services::{ActivityRecorder, PostService, PostSettings};
use postly_infra::InMemoryStore;

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub posts: PostService,
    pub twitter: Platform,
    pub linkedin: Platform,
    pub facebook: Platform,
}

pub fn fixture() -> Fixture {
    let twitter = Platform::new("Twitter", PlatformType::Twitter);
    let linkedin = Platform::new("LinkedIn", PlatformType::Linkedin);
    let facebook = Platform::new("Facebook", PlatformType::Facebook);
    let store = Arc::new(InMemoryStore::with_platforms([
        twitter.clone(),
        linkedin.clone(),
        facebook.clone(),
    ]));

    let posts = PostService::new(
        store.clone(),
        store.clone(),
        ActivityRecorder::new(store.clone()),
        PostSettings::default(),
    );

    Fixture {
        store,
        posts,
        twitter,
        linkedin,
        facebook,
    }
}

pub fn draft(platform_ids: Vec<Uuid>) -> NewPost {
    NewPost {
        title: "Launch day".to_string(),
        content: "We are live".to_string(),
        image_url: None,
        scheduled_time: None,
        status: PostStatus::Draft,
        platform_ids,
    }
}

/// Store a scheduled post directly, bypassing the "not in the past" rule.
pub async fn seed_scheduled(
    store: &InMemoryStore,
    user_id: Uuid,
    at: DateTime<Utc>,
    platform_ids: &[Uuid],
) -> PostWithPlatforms {
    let new = NewPost {
        scheduled_time: Some(at),
        status: PostStatus::Scheduled,
        ..draft(platform_ids.to_vec())
    };
    let unlimited = CreationQuota {
        limit: u64::MAX,
        from: DateTime::<Utc>::MIN_UTC,
        to: DateTime::<Utc>::MAX_UTC,
    };
    match PostRepository::create(store, Post::new(user_id, &new), platform_ids, unlimited)
        .await
        .unwrap()
    {
        CreateResult::Created(created) => created,
        CreateResult::QuotaReached { .. } => unreachable!("seeding has no quota"),
    }
}

pub async fn reload(store: &InMemoryStore, id: Uuid) -> PostWithPlatforms {
    PostRepository::find_by_id(store, id).await.unwrap().unwrap()
}
