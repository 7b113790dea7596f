//! Member directory port (read side).
//!
//! Defines the contract for resolving user accounts by email or id.
//! The directory is owned by the account-management side of the system;
//! family-group flows only ever read from it.
//!
//! # Design
//!
//! - **Typed misses**: an unknown email or id is `Ok(None)`, never an
//!   error payload the caller has to sniff
//! - **Read-only**: account mutation is out of scope for this crate

use crate::domain::foundation::{DomainError, EmailAddress, UserId};
use crate::domain::member::MemberProfile;
use async_trait::async_trait;

/// Directory port for resolving member profiles.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Find a profile by email.
    ///
    /// Returns `None` if no account uses this email. Unregistered
    /// invitees are an expected case, not an error.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<MemberProfile>, DomainError>;

    /// Find a profile by user id.
    ///
    /// Returns `None` if the account does not exist.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<MemberProfile>, DomainError>;

    /// Find every profile registered under one of the given emails.
    ///
    /// Emails with no account are simply absent from the result.
    async fn find_all_by_emails(
        &self,
        emails: &[EmailAddress],
    ) -> Result<Vec<MemberProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn member_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn MemberDirectory) {}
    }
}
