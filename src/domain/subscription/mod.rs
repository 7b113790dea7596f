//! Subscription domain module.
//!
//! Read-mostly view of billed subscriptions plus the family-group
//! member set and its admission rules.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity and admission outcomes
//! - `kind` - SubscriptionKind and GroupKind enums

mod aggregate;
mod kind;

pub use aggregate::{AdmitOutcome, Subscription, MAX_GROUP_MEMBERS};
pub use kind::{GroupKind, SubscriptionKind};
