//! Notification dispatcher port for transactional email.
//!
//! Defines the contract for the three family-group emails: invitation,
//! membership-canceled, and group-closed. Template selection and
//! rendering belong to the mailer implementation.
//!
//! # Design
//!
//! - **Fire-and-forget relative to data**: callers log failures and move
//!   on; a lost email never rolls back a membership change
//! - **Typed recipients**: contacts carry a validated address plus the
//!   display name the templates interpolate

use crate::domain::foundation::{DomainError, EmailAddress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Name/address pair the mailer templates interpolate.
///
/// For invitees with no registered profile the name is empty; for
/// removed members with no resolvable profile the bare email address
/// stands in for the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContact {
    /// Display name, possibly empty.
    pub name: String,

    /// Delivery address.
    pub email: EmailAddress,
}

impl EmailContact {
    /// Contact with a known display name.
    pub fn named(name: impl Into<String>, email: EmailAddress) -> Self {
        Self {
            name: name.into(),
            email,
        }
    }

    /// Contact for an address with no resolvable profile: the bare
    /// address doubles as the display name.
    pub fn bare(email: EmailAddress) -> Self {
        Self {
            name: email.as_str().to_string(),
            email,
        }
    }
}

/// Port for sending family-group notification emails.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Invite `recipient` into `sender`'s family group.
    async fn send_invitation(
        &self,
        sender: &EmailContact,
        recipient: &EmailContact,
    ) -> Result<(), NotificationError>;

    /// Tell `member` the owner removed them from the group.
    ///
    /// `had_subscription` selects the template variant for members who
    /// actually held coverage versus never-accepted invitees.
    async fn send_membership_canceled(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
        had_subscription: bool,
    ) -> Result<(), NotificationError>;

    /// Tell `member` the owner's group no longer exists.
    async fn send_group_closed(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
    ) -> Result<(), NotificationError>;
}

/// Errors from notification delivery.
#[derive(Debug, Clone)]
pub struct NotificationError {
    /// Human-readable message.
    pub message: String,

    /// Whether the send can be retried.
    pub retryable: bool,
}

impl NotificationError {
    /// Create a non-retryable delivery error.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    /// Create a retryable transport error (timeouts, connection loss).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NotificationError {}

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        use crate::domain::foundation::ErrorCode;
        DomainError::new(ErrorCode::EmailDeliveryError, err.message)
    }
}
