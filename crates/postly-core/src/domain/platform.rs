use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of destinations a post can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformType {
    Twitter,
    Instagram,
    Linkedin,
    Facebook,
    Tiktok,
}

impl PlatformType {
    pub const ALL: [PlatformType; 5] = [
        PlatformType::Twitter,
        PlatformType::Instagram,
        PlatformType::Linkedin,
        PlatformType::Facebook,
        PlatformType::Tiktok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Twitter => "twitter",
            PlatformType::Instagram => "instagram",
            PlatformType::Linkedin => "linkedin",
            PlatformType::Facebook => "facebook",
            PlatformType::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown platform type '{}'", s))
    }
}

/// Platform entity - a sharable destination, admin-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub platform_type: PlatformType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Platform {
    pub fn new(name: impl Into<String>, platform_type: PlatformType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            platform_type,
            created_at: now,
            updated_at: now,
        }
    }
}
