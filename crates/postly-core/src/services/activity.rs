use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ActivityLog;
use crate::ports::ActivityLogRepository;

/// Best-effort audit writer. A failed write is logged and swallowed so that
/// auditing never fails the operation being audited.
#[derive(Clone)]
pub struct ActivityRecorder {
    repo: Arc<dyn ActivityLogRepository>,
}

impl ActivityRecorder {
    pub fn new(repo: Arc<dyn ActivityLogRepository>) -> Self {
        Self { repo }
    }

    pub async fn record(&self, user_id: Uuid, action: &str, meta: serde_json::Value) {
        let entry = ActivityLog::new(user_id, action, meta);
        if let Err(e) = self.repo.record(entry).await {
            tracing::warn!(user_id = %user_id, action = %action, error = %e, "Failed to record activity");
        }
    }
}
