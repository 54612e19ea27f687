use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::PostStatus;
use crate::error::DomainError;
use crate::ports::PostRepository;

/// Per-user posting statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_posts: u64,
    pub scheduled_posts: u64,
    pub published_posts: u64,
    /// Platform name -> number of the user's posts targeting it.
    pub posts_per_platform: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    posts: Arc<dyn PostRepository>,
}

impl AnalyticsService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats, DomainError> {
        let posts = self.posts.find_by_user_id(user_id).await?;

        let mut stats = UserStats {
            total_posts: posts.len() as u64,
            ..Default::default()
        };
        for item in &posts {
            match item.post.status {
                PostStatus::Scheduled => stats.scheduled_posts += 1,
                PostStatus::Published => stats.published_posts += 1,
                PostStatus::Draft => {}
            }
            for edge in &item.platforms {
                *stats
                    .posts_per_platform
                    .entry(edge.platform.name.clone())
                    .or_default() += 1;
            }
        }
        Ok(stats)
    }
}
