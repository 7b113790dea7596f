//! Subscription aggregate entity.
//!
//! Subscriptions themselves (billing, renewal, payment state) are owned by
//! the billing side of the system. The family-group logic reads them and
//! mutates exactly one field: the `group` member set. The admission rules
//! live here so every caller shares one definition of a full group.
//!
//! # Design Decisions
//!
//! - **Owner excluded from `group`**: the owner's access comes from owning
//!   the subscription, never from the member set
//! - **Silent admission skips**: a full group or duplicate admit is a no-op
//!   reported through `AdmitOutcome`, not an error

use crate::domain::foundation::{SubscriptionId, UserId};
use serde::{Deserialize, Serialize};

use super::{GroupKind, SubscriptionKind};

/// Maximum number of members a family group can hold, owner excluded.
pub const MAX_GROUP_MEMBERS: usize = 5;

/// Outcome of attempting to admit a member into a subscription's group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// Member id appended to the group set.
    Admitted,
    /// Group already holds `MAX_GROUP_MEMBERS` members.
    GroupFull,
    /// Member id is already present in the group set.
    AlreadyMember,
    /// Member id equals the subscription owner's id.
    OwnerAsMember,
}

impl AdmitOutcome {
    /// Returns true when the admit call changed the group set.
    pub fn was_admitted(&self) -> bool {
        matches!(self, AdmitOutcome::Admitted)
    }
}

/// Subscription aggregate - a billed plan plus its shared member set.
///
/// # Invariants
///
/// - `group` never contains `owner_id`
/// - `group` holds at most `MAX_GROUP_MEMBERS` unique ids
/// - Mutation happens only through `admit` / `remove_member`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// User paying for the subscription.
    pub owner_id: UserId,

    /// Billing cadence.
    pub kind: SubscriptionKind,

    /// Single-account or family-group coverage.
    pub group_kind: GroupKind,

    /// Whether the subscription is currently active.
    pub active: bool,

    /// Member ids currently sharing the subscription, owner excluded.
    pub group: Vec<UserId>,
}

impl Subscription {
    /// Create an active family subscription with an empty group.
    pub fn new_family(id: SubscriptionId, owner_id: UserId, kind: SubscriptionKind) -> Self {
        Self {
            id,
            owner_id,
            kind,
            group_kind: GroupKind::Family,
            active: true,
            group: Vec::new(),
        }
    }

    /// Check whether this subscription is a live, shareable family group.
    pub fn is_family_group(&self) -> bool {
        self.active
            && self.kind == SubscriptionKind::Monthly
            && self.group_kind == GroupKind::Family
    }

    /// Check whether the member id is counted in this group.
    pub fn contains_member(&self, member_id: &UserId) -> bool {
        self.group.contains(member_id)
    }

    /// Admit a member into the group set.
    ///
    /// Violations of the group invariants are reported, never raised:
    /// the caller decides whether a skipped admit matters.
    pub fn admit(&mut self, member_id: UserId) -> AdmitOutcome {
        if self.group.len() >= MAX_GROUP_MEMBERS {
            return AdmitOutcome::GroupFull;
        }
        if self.group.contains(&member_id) {
            return AdmitOutcome::AlreadyMember;
        }
        if member_id == self.owner_id {
            return AdmitOutcome::OwnerAsMember;
        }
        self.group.push(member_id);
        AdmitOutcome::Admitted
    }

    /// Remove a member id from the group set.
    ///
    /// Returns true when the member was present and removed.
    pub fn remove_member(&mut self, member_id: &UserId) -> bool {
        let before = self.group.len();
        self.group.retain(|id| id != member_id);
        self.group.len() < before
    }
}
