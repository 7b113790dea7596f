//! Invitation ledger port.
//!
//! Defines the contract for persisting and querying Invitation records
//! outside of a multi-store transaction. Everything acceptance and
//! removal touch transactionally lives on `GroupTransaction` instead.
//!
//! # Design
//!
//! - **Pair-keyed**: one record per (owner, member email) pair; renewal
//!   rewrites the existing record rather than inserting a second one
//! - **Single-document operations only**: no method here spans stores

use crate::domain::foundation::{DomainError, EmailAddress, InvitationId, UserId};
use crate::domain::invitation::Invitation;
use async_trait::async_trait;

/// Ledger port for invitation record persistence.
#[async_trait]
pub trait InvitationLedger: Send + Sync {
    /// Insert a freshly issued invitation.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, invitation: &Invitation) -> Result<(), DomainError>;

    /// Find an invitation by its id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError>;

    /// All invitations issued by one group owner.
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Invitation>, DomainError>;

    /// Unanswered invitations addressed to the given email.
    ///
    /// Used to surface open invitations to a logged-in member.
    async fn find_new_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<Invitation>, DomainError>;

    /// The invitation currently counting this email in a group, if any.
    ///
    /// At most one record per email is subscribed at a time.
    async fn find_subscribed_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError>;

    /// Decline the invitation, guarded by the acting member's email.
    ///
    /// Returns true when a record matched both id and email. A foreign,
    /// unknown, or already-declined invitation matches nothing and
    /// reports false.
    async fn decline(
        &self,
        id: &InvitationId,
        member_email: &EmailAddress,
    ) -> Result<bool, DomainError>;

    /// Re-issue the invitation for the (owner, member email) pair.
    ///
    /// The owner email participates in the match so a stale owner
    /// profile cannot renew someone else's record. Declined records
    /// move back to New; records already New are returned untouched.
    /// Returns the refreshed invitation, or `None` when no renewable
    /// pair matched.
    async fn renew_for_pair(
        &self,
        owner_id: &UserId,
        owner_email: &EmailAddress,
        member_email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError>;
}
