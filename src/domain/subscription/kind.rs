//! Subscription kind enums.

use serde::{Deserialize, Serialize};

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    Monthly,
    Annual,
}

/// Whether a subscription covers a single account or a shareable family group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Single,
    Family,
}
