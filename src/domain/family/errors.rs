//! Family-group specific error types.
//!
//! Errors raised by the membership transition operations. Notification
//! failures never appear here: dispatch problems are logged by the
//! handlers and deliberately kept out of the data-mutation error path.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UserNotFound | 404 |
//! | InvitationNotFound | 404 |
//! | ForeignInvitation | 403 |
//! | SubscriptionNotFound | 404 |
//! | InvalidTransition | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, InvitationId, UserId};

/// Family-group specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyGroupError {
    /// A user id that must resolve (the acting owner) has no profile.
    UserNotFound(UserId),

    /// The target invitation does not exist.
    InvitationNotFound(InvitationId),

    /// The acting user tried to accept an invitation addressed to a
    /// different member email. Aborts the whole acceptance transaction.
    ForeignInvitation {
        invitation_id: InvitationId,
        user_id: UserId,
    },

    /// The group owner has no subscription record to admit members into.
    SubscriptionNotFound(UserId),

    /// The invitation's current status does not allow the attempted
    /// lifecycle step (e.g. accepting a declined invitation).
    InvalidTransition {
        current: String,
        reason: String,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Infrastructure error.
    Infrastructure(String),
}

impl FamilyGroupError {
    // Constructor functions for cleaner error creation

    pub fn user_not_found(id: UserId) -> Self {
        FamilyGroupError::UserNotFound(id)
    }

    pub fn invitation_not_found(id: InvitationId) -> Self {
        FamilyGroupError::InvitationNotFound(id)
    }

    pub fn foreign_invitation(invitation_id: InvitationId, user_id: UserId) -> Self {
        FamilyGroupError::ForeignInvitation {
            invitation_id,
            user_id,
        }
    }

    pub fn subscription_not_found(owner_id: UserId) -> Self {
        FamilyGroupError::SubscriptionNotFound(owner_id)
    }

    pub fn invalid_transition(current: impl Into<String>, reason: impl Into<String>) -> Self {
        FamilyGroupError::InvalidTransition {
            current: current.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FamilyGroupError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        FamilyGroupError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FamilyGroupError::UserNotFound(_) => ErrorCode::UserNotFound,
            FamilyGroupError::InvitationNotFound(_) => ErrorCode::InvitationNotFound,
            FamilyGroupError::ForeignInvitation { .. } => ErrorCode::Forbidden,
            FamilyGroupError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            FamilyGroupError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            FamilyGroupError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            FamilyGroupError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            FamilyGroupError::UserNotFound(id) => {
                format!("User not found: {}", id)
            }
            FamilyGroupError::InvitationNotFound(id) => {
                format!("Invitation not found: {}", id)
            }
            FamilyGroupError::ForeignInvitation {
                invitation_id,
                user_id,
            } => format!(
                "User {} attempted to join a family group via invitation {} addressed to another member",
                user_id, invitation_id
            ),
            FamilyGroupError::SubscriptionNotFound(owner_id) => {
                format!("No subscription found for group owner: {}", owner_id)
            }
            FamilyGroupError::InvalidTransition { current, reason } => {
                format!("Invitation in status '{}' cannot move: {}", current, reason)
            }
            FamilyGroupError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            FamilyGroupError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FamilyGroupError::Infrastructure(_))
    }
}

impl std::fmt::Display for FamilyGroupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for FamilyGroupError {}

impl From<DomainError> for FamilyGroupError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => FamilyGroupError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => FamilyGroupError::Infrastructure(err.to_string()),
        }
    }
}

impl From<FamilyGroupError> for DomainError {
    fn from(err: FamilyGroupError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
