//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `MemberDirectory` - Read-only user account resolution
//! - `InvitationLedger` - Invitation record persistence
//! - `SubscriptionStore` - Subscription reads
//! - `PendingInviteStore` - "Invitation waiting" markers on users
//! - `ClosedNoticeStore` - Group-closed notices per member
//!
//! ## Transaction Ports
//!
//! - `GroupUnitOfWork` / `GroupTransaction` - Atomic transitions across
//!   the invitation ledger and subscription group sets
//!
//! ## Side-Channel Ports
//!
//! - `NotificationDispatcher` - Invitation/cancellation/closure emails
//! - `FollowerSubscriptions` - Owner-as-teacher follow cleanup

mod closed_notice_store;
mod follower_subscriptions;
mod group_unit_of_work;
mod invitation_ledger;
mod member_directory;
mod notification_dispatcher;
mod pending_invite_store;
mod subscription_store;

pub use closed_notice_store::ClosedNoticeStore;
pub use follower_subscriptions::FollowerSubscriptions;
pub use group_unit_of_work::{GroupTransaction, GroupUnitOfWork};
pub use invitation_ledger::InvitationLedger;
pub use member_directory::MemberDirectory;
pub use notification_dispatcher::{EmailContact, NotificationDispatcher, NotificationError};
pub use pending_invite_store::PendingInviteStore;
pub use subscription_store::SubscriptionStore;
