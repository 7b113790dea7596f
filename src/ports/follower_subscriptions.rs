//! Follower subscriptions port.
//!
//! Group owners double as teachers their members follow for content
//! updates. Closing a group severs that relationship unless the owner's
//! whole account is being deleted, in which case account teardown owns
//! the cleanup.

use crate::domain::foundation::{DomainError, EmailAddress, UserId};
use async_trait::async_trait;

/// Port for the owner-as-teacher follow relationship.
#[async_trait]
pub trait FollowerSubscriptions: Send + Sync {
    /// Remove every follow of this teacher.
    async fn unsubscribe_from_teacher(
        &self,
        teacher_id: &UserId,
        teacher_email: &EmailAddress,
    ) -> Result<(), DomainError>;
}
