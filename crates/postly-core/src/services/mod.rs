//! Domain services - the operations exposed to the HTTP layer and the
//! background publisher, expressed against the ports only.

mod activity;
mod analytics;
mod platforms;
mod policy;
mod posts;
mod publisher;

pub use activity::ActivityRecorder;
pub use analytics::{AnalyticsService, UserStats};
pub use platforms::PlatformService;
pub use policy::ensure_owner;
pub use posts::{PostService, PostSettings, check_new_post_schedule, check_post_changes_schedule};
pub use publisher::{ScheduledPublisher, SweepOutcome, SweepReport};

use uuid::Uuid;

use crate::error::{DomainError, FieldErrors};
use crate::ports::PlatformRepository;

/// Verify a non-empty platform id list where every id references an existing
/// platform. Errors are keyed `platforms` or `platforms.<index>`, indexed
/// into `ids` as the client sent it, so check before deduplicating.
pub(crate) async fn check_platform_ids(
    platforms: &dyn PlatformRepository,
    ids: &[Uuid],
) -> Result<(), DomainError> {
    if ids.is_empty() {
        return FieldErrors::single("platforms", "The platforms field is required.").into_result();
    }

    let found = platforms.find_many(ids).await?;
    let mut errors = FieldErrors::new();
    for (index, id) in ids.iter().enumerate() {
        if !found.iter().any(|p| p.id == *id) {
            let field = format!("platforms.{}", index);
            errors.add(field.clone(), format!("The selected {} is invalid.", field));
        }
    }
    errors.into_result()
}
