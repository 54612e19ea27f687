//! Domain values rendered as wire DTOs.

use postly_core::domain::{Page, Platform, PostWithPlatforms, User};
use postly_core::services::UserStats;
use postly_shared::dto::{
    Paginated, PlatformResponse, PostPlatformResponse, PostResponse, UserResponse,
    UserStatsResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

pub fn platform(platform: Platform) -> PlatformResponse {
    PlatformResponse {
        id: platform.id,
        name: platform.name,
        platform_type: platform.platform_type.to_string(),
        created_at: platform.created_at,
        updated_at: platform.updated_at,
    }
}

pub fn post(item: PostWithPlatforms) -> PostResponse {
    let PostWithPlatforms { post, platforms } = item;
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        image_url: post.image_url,
        scheduled_time: post.scheduled_time,
        status: post.status.to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
        platforms: platforms
            .into_iter()
            .map(|edge| PostPlatformResponse {
                id: edge.platform.id,
                name: edge.platform.name,
                platform_type: edge.platform.platform_type.to_string(),
                platform_status: edge.platform_status.to_string(),
            })
            .collect(),
    }
}

pub fn paginated<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> Paginated<U> {
    let last_page = page.last_page();
    let page = page.map(f);
    Paginated {
        data: page.items,
        current_page: page.page,
        per_page: page.per_page,
        total: page.total,
        last_page,
    }
}

pub fn user_stats(stats: UserStats) -> UserStatsResponse {
    UserStatsResponse {
        total_posts: stats.total_posts,
        scheduled_posts: stats.scheduled_posts,
        published_posts: stats.published_posts,
        posts_per_platform: stats.posts_per_platform,
    }
}
