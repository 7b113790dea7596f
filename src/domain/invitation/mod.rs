//! Invitation domain module.
//!
//! Handles the lifecycle of family-group invitations: issuance,
//! acceptance, decline, and renewal.
//!
//! # Module Structure
//!
//! - `record` - Invitation aggregate entity
//! - `status` - InvitationStatus state machine
//! - `roster` - read-side roster and invitation views

mod record;
mod roster;
mod status;

pub use record::Invitation;
pub use roster::{FamilyMemberEntry, MemberInvitationView};
pub use status::InvitationStatus;
