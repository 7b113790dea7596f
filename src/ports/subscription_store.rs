//! Subscription store port (read side).
//!
//! Defines the contract for reading subscription records outside of a
//! multi-store transaction. Group member-set writes are deliberately
//! absent: they only happen through `GroupTransaction`.
//!
//! # Design
//!
//! - **Covering lookup**: a user is covered either by owning a
//!   subscription or by appearing in another subscription's group set
//! - **Typed misses**: `Ok(None)` for users without coverage

use crate::domain::foundation::{DomainError, EmailAddress, UserId};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Store port for subscription reads.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Find the active subscription covering the account registered
    /// under this email.
    ///
    /// Returns `None` when the email is unregistered or uncovered.
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find the subscription covering this user: owned by them, or an
    /// active one holding them in its group set.
    ///
    /// Owned subscriptions win when both exist.
    async fn find_covering(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError>;

    /// Find the subscription owned by this user.
    ///
    /// Returns `None` if the user owns no subscription.
    async fn find_by_owner(&self, owner_id: &UserId)
        -> Result<Option<Subscription>, DomainError>;
}
