//! Domain entities - the core business objects.

mod activity;
mod page;
mod platform;
mod post;
mod user;

pub use activity::ActivityLog;
pub use page::{MAX_PAGE, Page, PageRequest};
pub use platform::{Platform, PlatformType};
pub use post::{
    NewPost, PlatformStatus, Post, PostChanges, PostFilter, PostPlatform, PostStatus,
    PostWithPlatforms, dedup_ids, utc_day_range,
};
pub use user::{ROLE_ADMIN, ROLE_USER, User};
