//! Invitation aggregate entity.
//!
//! An Invitation tracks one (group owner, member email) pair through the
//! family-group lifecycle. The pair is the natural key: re-inviting the
//! same address renews the existing record instead of creating a second one.
//!
//! # Design Decisions
//!
//! - **Email as member key**: invitations may address users who have not
//!   registered yet, so the member side is an email, not a user id
//! - **Denormalized owner fields**: owner email and name are copied onto the
//!   record so invitation surfacing needs no directory join
//! - **`subscribed` flag**: true only while the member is counted in the
//!   owner's group; kept in lockstep with `status` by the mutation methods

use crate::domain::foundation::{
    DomainError, EmailAddress, ErrorCode, InvitationId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::InvitationStatus;

/// Invitation aggregate - one member email's relationship to one owner's group.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `subscribed` implies `status == Approved`
/// - Status transitions follow state machine rules
/// - At most one record per member email has `subscribed == true`
///   (enforced by the membership orchestration, not by this type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique identifier for this invitation.
    pub id: InvitationId,

    /// Owner of the family group the member is invited into.
    pub group_owner_id: UserId,

    /// Owner's email, denormalized for notification building.
    pub group_owner_email: EmailAddress,

    /// Owner's display name, denormalized for notification building.
    pub group_owner_name: String,

    /// Address the invitation was sent to.
    pub group_member_email: EmailAddress,

    /// Current status in the invitation lifecycle.
    pub status: InvitationStatus,

    /// True while the member is counted in the owner's group.
    pub subscribed: bool,

    /// When the record was last issued or answered.
    pub processed_at: Timestamp,
}

impl Invitation {
    /// Issue a fresh invitation from an owner to a member email.
    ///
    /// New invitations start unanswered and unsubscribed.
    pub fn issue(
        id: InvitationId,
        group_owner_id: UserId,
        group_owner_email: EmailAddress,
        group_owner_name: String,
        group_member_email: EmailAddress,
    ) -> Self {
        Self {
            id,
            group_owner_id,
            group_owner_email,
            group_owner_name,
            group_member_email,
            status: InvitationStatus::New,
            subscribed: false,
            processed_at: Timestamp::now(),
        }
    }

    /// Check whether this invitation is addressed to the given email.
    pub fn is_addressed_to(&self, email: &EmailAddress) -> bool {
        &self.group_member_email == email
    }

    /// Check whether the member is currently counted in the owner's group.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Accept this invitation.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn approve(&mut self) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::Approved)?;
        self.subscribed = true;
        self.processed_at = Timestamp::now();
        Ok(())
    }

    /// Decline this invitation, or withdraw an accepted one.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn decline(&mut self) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::Declined)?;
        self.subscribed = false;
        self.processed_at = Timestamp::now();
        Ok(())
    }

    /// Re-issue a previously declined invitation.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn renew(&mut self) -> Result<(), DomainError> {
        self.transition_to(InvitationStatus::New)?;
        self.subscribed = false;
        self.processed_at = Timestamp::now();
        Ok(())
    }

    /// Transition to a new status using the state machine.
    fn transition_to(&mut self, target: InvitationStatus) -> Result<(), DomainError> {
        use crate::domain::foundation::StateMachine;

        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition invitation from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_email() -> EmailAddress {
        EmailAddress::new("owner@example.com").unwrap()
    }

    fn member_email() -> EmailAddress {
        EmailAddress::new("member@example.com").unwrap()
    }

    fn test_invitation() -> Invitation {
        Invitation::issue(
            InvitationId::new(),
            UserId::new(),
            owner_email(),
            "Group Owner".to_string(),
            member_email(),
        )
    }

    // Construction tests

    #[test]
    fn issue_starts_new_and_unsubscribed() {
        let invitation = test_invitation();

        assert_eq!(invitation.status, InvitationStatus::New);
        assert!(!invitation.subscribed);
        assert_eq!(invitation.group_member_email, member_email());
    }

    #[test]
    fn is_addressed_to_matches_member_email() {
        let invitation = test_invitation();

        assert!(invitation.is_addressed_to(&member_email()));
        assert!(!invitation.is_addressed_to(&owner_email()));
    }

    // Lifecycle transition tests

    #[test]
    fn new_invitation_can_be_approved() {
        let mut invitation = test_invitation();

        let result = invitation.approve();
        assert!(result.is_ok());
        assert_eq!(invitation.status, InvitationStatus::Approved);
        assert!(invitation.subscribed);
    }

    #[test]
    fn new_invitation_can_be_declined() {
        let mut invitation = test_invitation();

        let result = invitation.decline();
        assert!(result.is_ok());
        assert_eq!(invitation.status, InvitationStatus::Declined);
        assert!(!invitation.subscribed);
    }

    #[test]
    fn approved_invitation_can_be_declined() {
        let mut invitation = test_invitation();
        invitation.approve().unwrap();

        let result = invitation.decline();
        assert!(result.is_ok());
        assert_eq!(invitation.status, InvitationStatus::Declined);
        assert!(!invitation.subscribed);
    }

    #[test]
    fn decline_clears_subscribed_flag() {
        let mut invitation = test_invitation();
        invitation.approve().unwrap();
        assert!(invitation.subscribed);

        invitation.decline().unwrap();
        assert!(!invitation.subscribed);
    }

    #[test]
    fn declined_invitation_can_be_renewed() {
        let mut invitation = test_invitation();
        invitation.decline().unwrap();

        let result = invitation.renew();
        assert!(result.is_ok());
        assert_eq!(invitation.status, InvitationStatus::New);
        assert!(!invitation.subscribed);
    }

    #[test]
    fn new_invitation_cannot_be_renewed() {
        let mut invitation = test_invitation();

        let result = invitation.renew();
        assert!(result.is_err());
        assert_eq!(invitation.status, InvitationStatus::New);
    }

    #[test]
    fn approved_invitation_cannot_be_approved_again() {
        let mut invitation = test_invitation();
        invitation.approve().unwrap();

        let result = invitation.approve();
        assert!(result.is_err());
    }

    #[test]
    fn transitions_touch_processed_at() {
        let mut invitation = test_invitation();
        let issued_at = invitation.processed_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        invitation.approve().unwrap();

        assert!(invitation.processed_at.is_after(&issued_at));
    }
}
