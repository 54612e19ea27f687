//! Ownership checks applied uniformly to every post operation.

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

/// Fail with `Forbidden` unless `user_id` owns `post`.
pub fn ensure_owner(post: &Post, user_id: Uuid) -> Result<(), DomainError> {
    if post.is_owned_by(user_id) {
        Ok(())
    } else {
        tracing::warn!(post_id = %post.id, user_id = %user_id, "Rejected access to post owned by another user");
        Err(DomainError::Forbidden)
    }
}
