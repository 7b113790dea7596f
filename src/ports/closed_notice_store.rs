//! Group-closed notice store port.
//!
//! Holds at most one "your group was closed" notice per member, written
//! when an owner's subscription ends and deleted once the member has
//! seen it.

use crate::domain::family::GroupClosedNotice;
use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// Store port for group-closed notices.
#[async_trait]
pub trait ClosedNoticeStore: Send + Sync {
    /// Save the notice, replacing any unread notice for the same member.
    async fn save(&self, notice: &GroupClosedNotice) -> Result<(), DomainError>;

    /// The member's unread notice, if any.
    async fn get(&self, member_id: &UserId) -> Result<Option<GroupClosedNotice>, DomainError>;

    /// Delete the member's notice. Deleting an absent notice succeeds.
    async fn delete(&self, member_id: &UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn closed_notice_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ClosedNoticeStore) {}
    }
}
