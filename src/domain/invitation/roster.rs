//! Roster views over invitation records.
//!
//! Read-side projections the invitation surfacing queries return:
//! the owner's member roster and the member's own open invitations.

use serde::Serialize;

use crate::domain::foundation::{EmailAddress, InvitationId};
use crate::domain::member::MemberProfile;

use super::{Invitation, InvitationStatus};

/// One row of a group owner's member roster.
///
/// Exactly one of the lifecycle flags describes where the invitee
/// stands; `is_pending` marks addresses that never registered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberEntry {
    pub email: EmailAddress,

    /// Display name; empty for unregistered invitees.
    pub name: String,

    /// Invited address with no registered account.
    pub is_pending: bool,

    /// Registered, invitation still unanswered.
    pub is_waiting: bool,

    /// Registered, invitation declined.
    pub is_declined: bool,

    /// Counted in the owner's group right now.
    pub is_subscribed: bool,
}

impl FamilyMemberEntry {
    /// Roster row for a registered member, flagged from their invitation.
    pub fn registered(profile: &MemberProfile, invitation: &Invitation) -> Self {
        Self {
            email: profile.email.clone(),
            name: profile.name.clone(),
            is_pending: false,
            is_waiting: invitation.status == InvitationStatus::New,
            is_declined: invitation.status == InvitationStatus::Declined,
            is_subscribed: invitation.subscribed,
        }
    }

    /// Roster row for an invited address with no registered profile.
    pub fn pending(email: EmailAddress) -> Self {
        Self {
            email,
            name: String::new(),
            is_pending: true,
            is_waiting: false,
            is_declined: false,
            is_subscribed: false,
        }
    }
}

/// An open invitation as surfaced to the invited member.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInvitationView {
    pub id: InvitationId,
    pub group_owner_name: String,
    pub group_owner_email: EmailAddress,
}

impl From<&Invitation> for MemberInvitationView {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id,
            group_owner_name: invitation.group_owner_name.clone(),
            group_owner_email: invitation.group_owner_email.clone(),
        }
    }
}
