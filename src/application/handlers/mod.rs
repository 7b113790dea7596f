//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod family_group;

pub use family_group::{
    // Invitation lifecycle
    AcceptInvitationCommand, AcceptInvitationHandler, AcceptInvitationResult,
    AddFamilyMemberCommand, AddFamilyMemberHandler, AddFamilyMemberResult,
    DeclineInvitationCommand, DeclineInvitationHandler, DeclineInvitationResult,
    RenewInvitationCommand, RenewInvitationHandler, RenewInvitationResult,
    // Membership removal and closure
    CloseFamilyGroupCommand, CloseFamilyGroupHandler, CloseFamilyGroupResult,
    DropFamilyMemberCommand, DropFamilyMemberHandler, DropFamilyMemberResult,
    // Closed-group notices
    DropGroupClosedMessageCommand, DropGroupClosedMessageHandler,
    GetGroupClosedMessageHandler, GetGroupClosedMessageQuery, GetGroupClosedMessageResult,
    // Roster and invitation surfacing
    ListFamilyMembersHandler, ListFamilyMembersQuery, ListFamilyMembersResult,
    ListMemberInvitationsHandler, ListMemberInvitationsQuery, ListMemberInvitationsResult,
};
