//! Family group handlers.
//!
//! Command and query handlers for the family-group membership lifecycle:
//!
//! ## Commands
//! - Inviting a member into an owner's group
//! - Accepting, declining, and renewing invitations
//! - Removing members (owner- or self-initiated)
//! - Closing a group when the owner's subscription ends
//! - Acknowledging a closed-group notice
//!
//! ## Queries
//! - List an owner's member roster
//! - List a member's open invitations
//! - Get a member's closed-group notice

mod accept_invitation;
mod add_family_member;
mod close_family_group;
mod decline_invitation;
mod drop_family_member;
mod drop_group_closed_message;
mod get_group_closed_message;
mod list_family_members;
mod list_member_invitations;
mod renew_invitation;

// Commands
pub use accept_invitation::{AcceptInvitationCommand, AcceptInvitationHandler, AcceptInvitationResult};
pub use add_family_member::{
    AddFamilyMemberCommand, AddFamilyMemberHandler, AddFamilyMemberResult,
};
pub use close_family_group::{
    CloseFamilyGroupCommand, CloseFamilyGroupHandler, CloseFamilyGroupResult,
};
pub use decline_invitation::{
    DeclineInvitationCommand, DeclineInvitationHandler, DeclineInvitationResult,
};
pub use drop_family_member::{
    DropFamilyMemberCommand, DropFamilyMemberHandler, DropFamilyMemberResult,
};
pub use drop_group_closed_message::{DropGroupClosedMessageCommand, DropGroupClosedMessageHandler};
pub use renew_invitation::{RenewInvitationCommand, RenewInvitationHandler, RenewInvitationResult};

// Queries
pub use get_group_closed_message::{
    GetGroupClosedMessageHandler, GetGroupClosedMessageQuery, GetGroupClosedMessageResult,
};
pub use list_family_members::{
    ListFamilyMembersHandler, ListFamilyMembersQuery, ListFamilyMembersResult,
};
pub use list_member_invitations::{
    ListMemberInvitationsHandler, ListMemberInvitationsQuery, ListMemberInvitationsResult,
};
