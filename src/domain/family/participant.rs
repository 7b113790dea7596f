//! Group participant value object.

use crate::domain::foundation::{EmailAddress, UserId};
use serde::{Deserialize, Serialize};

/// One member's place in one family group, as reported by the
/// acceptance and removal operations. Callers use it for bookkeeping
/// that follows a membership change (search indexes, UI updates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParticipant {
    /// The member's user id.
    pub user_id: UserId,

    /// The member's email.
    pub email: EmailAddress,

    /// Email of the owner whose group the member joined or left.
    pub group_owner_email: EmailAddress,
}

impl GroupParticipant {
    pub fn new(user_id: UserId, email: EmailAddress, group_owner_email: EmailAddress) -> Self {
        Self {
            user_id,
            email,
            group_owner_email,
        }
    }
}
