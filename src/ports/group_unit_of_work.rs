//! Unit-of-work port for multi-store membership transitions.
//!
//! Acceptance and removal must mutate the invitation ledger and the
//! subscription group sets together: readers may never observe a member
//! counted in two groups, or dropped from one without landing in the
//! next. This port hands out a transaction handle scoped to exactly the
//! mutations those flows need.
//!
//! # Design
//!
//! - **Commit consumes**: `commit` takes the boxed handle by value, so
//!   a committed transaction cannot be reused
//! - **Drop rolls back**: abandoning the handle without committing
//!   discards every staged mutation
//! - **Read-your-writes**: reads through the handle observe the
//!   transaction's own uncommitted mutations

use crate::domain::foundation::{DomainError, EmailAddress, InvitationId, SubscriptionId, UserId};
use crate::domain::invitation::Invitation;
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Factory port for group membership transactions.
#[async_trait]
pub trait GroupUnitOfWork: Send + Sync {
    /// Begin a transaction spanning the invitation ledger and the
    /// subscription store.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` when a transaction cannot be opened
    async fn begin(&self) -> Result<Box<dyn GroupTransaction>, DomainError>;
}

/// One atomic membership transition across ledger and subscriptions.
///
/// All mutations stage inside the transaction; nothing is visible to
/// other readers until `commit` succeeds.
#[async_trait]
pub trait GroupTransaction: Send {
    /// Find an invitation by id, observing staged mutations.
    async fn find_invitation(
        &mut self,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError>;

    /// Persist the full state of an invitation record.
    ///
    /// # Errors
    ///
    /// - `InvitationNotFound` if the record does not exist
    async fn update_invitation(&mut self, invitation: &Invitation) -> Result<(), DomainError>;

    /// Decline every subscribed invitation for this email except the
    /// given one, clearing their subscribed flags.
    ///
    /// Returns the number of records changed.
    async fn decline_subscribed_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError>;

    /// Decline every unanswered invitation for this email except the
    /// given one.
    ///
    /// Returns the number of records changed.
    async fn decline_pending_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError>;

    /// Delete all invitation records for the (owner, member email) pair.
    ///
    /// Returns the number of records deleted.
    async fn delete_invitations_for_pair(
        &mut self,
        owner_id: &UserId,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError>;

    /// Delete the subscribed invitation record for this email, if any.
    ///
    /// Returns the number of records deleted (0 or 1).
    async fn delete_subscribed_invitation(
        &mut self,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError>;

    /// Find the subscription owned by this user, observing staged
    /// mutations.
    async fn find_subscription_by_owner(
        &mut self,
        owner_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Persist a subscription's group member set.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the record does not exist
    async fn update_group_members(
        &mut self,
        subscription_id: &SubscriptionId,
        members: &[UserId],
    ) -> Result<(), DomainError>;

    /// Pull the member id out of every active family group set holding it.
    ///
    /// Returns the number of subscriptions changed.
    async fn remove_member_from_groups(&mut self, member_id: &UserId)
        -> Result<u64, DomainError>;

    /// Commit every staged mutation atomically.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` when the commit fails; nothing is applied
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety tests
    #[test]
    fn group_unit_of_work_is_object_safe() {
        fn _accepts_dyn(_uow: &dyn GroupUnitOfWork) {}
    }

    #[test]
    fn group_transaction_is_object_safe() {
        fn _accepts_dyn(_tx: &dyn GroupTransaction) {}
    }
}
