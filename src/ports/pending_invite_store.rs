//! Pending-invite marker port.
//!
//! A lightweight flag on a registered user signaling "you have a family
//! invitation waiting", surfaced by their client at login. Registered on
//! issuance and renewal, removed when the owner drops the member.

use crate::domain::foundation::{DomainError, UserId};
use async_trait::async_trait;

/// Store port for pending-invite markers.
#[async_trait]
pub trait PendingInviteStore: Send + Sync {
    /// Register a marker for the user. Registering twice is a no-op.
    async fn register(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Remove the user's marker. Removing an absent marker is a no-op.
    async fn remove(&self, user_id: &UserId) -> Result<(), DomainError>;
}
