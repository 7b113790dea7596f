//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `member` - Directory view of user accounts
//! - `invitation` - Invitation lifecycle: issuance, acceptance, decline, renewal
//! - `subscription` - Subscription view and family-group admission rules
//! - `family` - Cross-cutting family-group types and errors

pub mod family;
pub mod foundation;
pub mod invitation;
pub mod member;
pub mod subscription;
