//! Email address value object.
//!
//! Invitations key on member email, so equality must survive case and
//! whitespace differences between what the owner typed and what the
//! directory stores. Construction normalizes; comparisons are plain `==`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Validated, normalized (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates an EmailAddress, normalizing case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the address is empty or has no
    /// user/domain part around a single `@`.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let normalized = raw.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        match normalized.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {
                Ok(Self(normalized))
            }
            _ => Err(ValidationError::invalid_format(
                "email",
                "expected user@domain",
            )),
        }
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
