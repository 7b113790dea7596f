//! Family-group domain module.
//!
//! Cross-cutting types for the family-group membership operations.
//!
//! # Module Structure
//!
//! - `errors` - FamilyGroupError for the transition operations
//! - `closed_notice` - GroupClosedNotice left for members of a closed group
//! - `participant` - GroupParticipant membership-change bookkeeping

mod closed_notice;
mod errors;
mod participant;

pub use closed_notice::GroupClosedNotice;
pub use errors::FamilyGroupError;
pub use participant::GroupParticipant;
