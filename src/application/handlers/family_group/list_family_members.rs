//! ListFamilyMembersHandler - Query handler for a group owner's roster.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::{EmailAddress, UserId};
use crate::domain::invitation::{FamilyMemberEntry, Invitation};
use crate::ports::{InvitationLedger, MemberDirectory};

/// Query for the roster of everyone an owner has invited.
#[derive(Debug, Clone)]
pub struct ListFamilyMembersQuery {
    pub owner_id: UserId,
}

/// Result of a roster query.
pub type ListFamilyMembersResult = Vec<FamilyMemberEntry>;

/// Handler joining the owner's invitations with directory profiles.
///
/// Registered invitees appear with their profile name and lifecycle
/// flags; addresses that never registered appear as pending rows.
pub struct ListFamilyMembersHandler {
    ledger: Arc<dyn InvitationLedger>,
    directory: Arc<dyn MemberDirectory>,
}

impl ListFamilyMembersHandler {
    pub fn new(ledger: Arc<dyn InvitationLedger>, directory: Arc<dyn MemberDirectory>) -> Self {
        Self { ledger, directory }
    }

    pub async fn handle(
        &self,
        query: ListFamilyMembersQuery,
    ) -> Result<ListFamilyMembersResult, FamilyGroupError> {
        // 1. Every invitation the owner has issued, one per member email
        let invitations = self.ledger.find_by_owner(&query.owner_id).await?;
        let by_email: HashMap<&EmailAddress, &Invitation> = invitations
            .iter()
            .map(|invitation| (&invitation.group_member_email, invitation))
            .collect();

        // 2. Resolve the invited addresses that registered an account
        let emails: Vec<EmailAddress> = invitations
            .iter()
            .map(|invitation| invitation.group_member_email.clone())
            .collect();
        let profiles = self.directory.find_all_by_emails(&emails).await?;

        let mut roster: Vec<FamilyMemberEntry> = profiles
            .iter()
            .filter_map(|profile| {
                by_email
                    .get(&profile.email)
                    .map(|invitation| FamilyMemberEntry::registered(profile, invitation))
            })
            .collect();

        // 3. Everything invited but never registered shows up as pending
        let registered: HashSet<&EmailAddress> =
            profiles.iter().map(|profile| &profile.email).collect();
        roster.extend(
            emails
                .iter()
                .filter(|email| !registered.contains(email))
                .map(|email| FamilyMemberEntry::pending(email.clone())),
        );

        Ok(roster)
    }
}
