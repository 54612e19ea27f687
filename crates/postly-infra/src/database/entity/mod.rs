//! SeaORM entities for the PostgreSQL schema.

pub mod activity_log;
pub mod platform;
pub mod post;
pub mod post_platform;
pub mod user;
pub mod user_platform;
