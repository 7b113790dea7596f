//! Group-closed notice entity.
//!
//! When an owner's subscription ends, each member gets one durable notice
//! naming the group that disappeared. The member's client reads it once
//! and deletes it.

use crate::domain::foundation::{EmailAddress, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Durable "your family group was closed" message, keyed by member id.
///
/// # Invariants
///
/// - At most one notice per member id; a later closure overwrites an
///   unread earlier one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupClosedNotice {
    /// Member the notice is addressed to.
    pub member_id: UserId,

    /// Email of the owner whose group closed.
    pub group_owner_email: EmailAddress,

    /// Name of the owner whose group closed.
    pub group_owner_name: String,

    /// When the group was closed.
    pub created_at: Timestamp,
}

impl GroupClosedNotice {
    /// Create a notice for one member of a closing group.
    pub fn new(
        member_id: UserId,
        group_owner_email: EmailAddress,
        group_owner_name: impl Into<String>,
    ) -> Self {
        Self {
            member_id,
            group_owner_email,
            group_owner_name: group_owner_name.into(),
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_carries_owner_identity() {
        let member_id = UserId::new();
        let notice = GroupClosedNotice::new(
            member_id,
            EmailAddress::new("owner@example.com").unwrap(),
            "Group Owner",
        );

        assert_eq!(notice.member_id, member_id);
        assert_eq!(notice.group_owner_name, "Group Owner");
        assert_eq!(notice.group_owner_email.as_str(), "owner@example.com");
    }
}
