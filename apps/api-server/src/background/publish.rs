//! One publish sweep at the current wall-clock time.

use chrono::Utc;

use postly_core::error::DomainError;
use postly_core::services::{ScheduledPublisher, SweepOutcome};

/// Run a sweep now. A failure to even select due posts is logged and
/// returned; per-post failures are part of the report.
pub async fn run_publish_sweep(
    publisher: &ScheduledPublisher,
) -> Result<SweepOutcome, DomainError> {
    let now = Utc::now();
    tracing::debug!(now = %now, "Starting publish sweep");

    publisher.sweep(now).await.inspect_err(|e| {
        tracing::error!(error = %e, "Publish sweep failed");
    })
}
