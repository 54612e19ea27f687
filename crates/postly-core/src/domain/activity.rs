use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An audit record of something a user did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    pub fn new(user_id: Uuid, action: impl Into<String>, meta: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action: action.into(),
            meta,
            created_at: Utc::now(),
        }
    }
}
