//! Member domain module.
//!
//! Directory-facing view of user accounts.
//!
//! # Module Structure
//!
//! - `profile` - MemberProfile entity

mod profile;

pub use profile::MemberProfile;
