//! Member profile entity.
//!
//! Directory view of a user account, as the family-group flows see it.
//! Account management itself lives elsewhere; this type carries just the
//! fields invitation and notification building need.

use crate::domain::foundation::{EmailAddress, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Directory profile of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Unique identifier of the account.
    pub id: UserId,

    /// Account email, unique per account.
    pub email: EmailAddress,

    /// Display name.
    pub name: String,

    /// Set when the account is soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

impl MemberProfile {
    /// Create a live profile.
    pub fn new(id: UserId, email: EmailAddress, name: impl Into<String>) -> Self {
        Self {
            id,
            email,
            name: name.into(),
            deleted_at: None,
        }
    }

    /// Check whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
