//! RenewInvitationHandler - Command handler for re-issuing a declined invitation.

use std::sync::Arc;

use tracing::error;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::{EmailAddress, UserId};
use crate::domain::invitation::Invitation;
use crate::ports::{
    EmailContact, InvitationLedger, MemberDirectory, NotificationDispatcher, PendingInviteStore,
};

/// Command to renew the invitation for one (owner, member email) pair.
#[derive(Debug, Clone)]
pub struct RenewInvitationCommand {
    pub owner_id: UserId,
    pub owner_email: EmailAddress,
    pub owner_name: String,
    pub member_email: EmailAddress,
}

/// Result of a renewal attempt.
#[derive(Debug, Clone)]
pub struct RenewInvitationResult {
    /// The refreshed invitation, `None` when no renewable record
    /// matched the pair.
    pub invitation: Option<Invitation>,
}

/// Handler for renewing family-group invitations.
///
/// Moves the pair's Declined record back to New and re-runs the
/// issuance side effects: the pending-invite marker for registered
/// members and the invitation email. Group membership is untouched;
/// the member rejoins only by accepting again.
pub struct RenewInvitationHandler {
    ledger: Arc<dyn InvitationLedger>,
    directory: Arc<dyn MemberDirectory>,
    pending_invites: Arc<dyn PendingInviteStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl RenewInvitationHandler {
    pub fn new(
        ledger: Arc<dyn InvitationLedger>,
        directory: Arc<dyn MemberDirectory>,
        pending_invites: Arc<dyn PendingInviteStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            ledger,
            directory,
            pending_invites,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: RenewInvitationCommand,
    ) -> Result<RenewInvitationResult, FamilyGroupError> {
        // 1. Reset the pair's record to New, guarded by the owner's email
        let invitation = self
            .ledger
            .renew_for_pair(&cmd.owner_id, &cmd.owner_email, &cmd.member_email)
            .await?;

        // 2. Re-flag the pending invite on registered accounts
        let profile = self.directory.find_by_email(&cmd.member_email).await?;
        if let Some(profile) = &profile {
            self.pending_invites.register(&profile.id).await?;
        }

        // 3. Re-send the invitation email (best-effort)
        let sender = EmailContact::named(cmd.owner_name.clone(), cmd.owner_email.clone());
        let recipient = match &profile {
            Some(profile) => EmailContact::named(profile.name.clone(), profile.email.clone()),
            None => EmailContact::named("", cmd.member_email.clone()),
        };
        if let Err(err) = self.notifier.send_invitation(&sender, &recipient).await {
            error!(
                member_email = %cmd.member_email,
                error = %err,
                "Failed to re-send family group invitation email"
            );
        }

        Ok(RenewInvitationResult { invitation })
    }
}
