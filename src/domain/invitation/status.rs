//! Invitation status state machine.
//!
//! Defines all possible invitation states and valid transitions
//! according to the family-group membership lifecycle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Family-group invitation status.
///
/// Represents where one (owner, member email) pair currently sits in
/// the invite/accept/decline lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Freshly issued (or renewed) invitation awaiting the member's answer.
    New,

    /// Member accepted. The record additionally carries a `subscribed`
    /// flag while the member is counted in the owner's group.
    Approved,

    /// Member declined, left, or the invitation was superseded by
    /// acceptance into another group.
    Declined,
}

impl InvitationStatus {
    /// Returns true while the invitation is waiting for the member to answer.
    pub fn is_awaiting_response(&self) -> bool {
        matches!(self, InvitationStatus::New)
    }
}

impl StateMachine for InvitationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvitationStatus::*;
        matches!(
            (self, target),
            // From NEW
            (New, Approved)
                | (New, Declined)
            // From APPROVED
                | (Approved, Declined) // leave, drop, or superseded
            // From DECLINED
                | (Declined, New) // renewal
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InvitationStatus::*;
        match self {
            New => vec![Approved, Declined],
            Approved => vec![Declined],
            Declined => vec![New],
        }
    }
}
