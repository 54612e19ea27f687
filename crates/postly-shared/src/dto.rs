//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional at the wire level so that a missing field is
//! reported as a field-level validation error rather than a parse failure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
    pub scheduled_time: Option<String>,
    pub status: Option<String>,
    /// Platform ids.
    pub platforms: Option<Vec<String>>,
}

/// Partial update of a post. A present `platforms` list resyncs every association.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<Option<String>>,
    pub status: Option<String>,
    pub platforms: Option<Vec<String>>,
}

/// Query string for `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostQuery {
    pub status: Option<String>,
    /// `YYYY-MM-DD`, matched against the UTC date of `scheduled_time`.
    pub date: Option<String>,
    pub page: Option<u64>,
}

/// Query string for plain paginated listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// Replace the caller's active platform set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TogglePlatformsRequest {
    pub platforms: Option<Vec<String>>,
}

/// Admin update of a platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePlatformRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub platform_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub platform_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A platform as attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPlatformResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub platform_type: String,
    pub platform_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub platforms: Vec<PostPlatformResponse>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub total_posts: u64,
    pub scheduled_posts: u64,
    pub published_posts: u64,
    pub posts_per_platform: BTreeMap<String, u64>,
}
