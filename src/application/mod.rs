//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Invitation lifecycle handlers
    AcceptInvitationCommand, AcceptInvitationHandler, AcceptInvitationResult,
    AddFamilyMemberCommand, AddFamilyMemberHandler, AddFamilyMemberResult,
    DeclineInvitationCommand, DeclineInvitationHandler, DeclineInvitationResult,
    RenewInvitationCommand, RenewInvitationHandler, RenewInvitationResult,
    // Removal and closure handlers
    CloseFamilyGroupCommand, CloseFamilyGroupHandler, CloseFamilyGroupResult,
    DropFamilyMemberCommand, DropFamilyMemberHandler, DropFamilyMemberResult,
    DropGroupClosedMessageCommand, DropGroupClosedMessageHandler,
    // Query handlers
    GetGroupClosedMessageHandler, GetGroupClosedMessageQuery, GetGroupClosedMessageResult,
    ListFamilyMembersHandler, ListFamilyMembersQuery, ListFamilyMembersResult,
    ListMemberInvitationsHandler, ListMemberInvitationsQuery, ListMemberInvitationsResult,
};
