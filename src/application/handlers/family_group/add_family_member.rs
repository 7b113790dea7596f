//! AddFamilyMemberHandler - Command handler for inviting a member into a family group.

use std::sync::Arc;

use tracing::error;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::{EmailAddress, InvitationId, UserId};
use crate::domain::invitation::Invitation;
use crate::ports::{
    EmailContact, InvitationLedger, MemberDirectory, NotificationDispatcher, PendingInviteStore,
    SubscriptionStore,
};

/// Command to invite a member email into the owner's family group.
#[derive(Debug, Clone)]
pub struct AddFamilyMemberCommand {
    pub owner_id: UserId,
    pub owner_email: EmailAddress,
    pub owner_name: String,
    pub member_email: EmailAddress,
}

/// Result of an invitation issuance attempt.
#[derive(Debug, Clone)]
pub struct AddFamilyMemberResult {
    /// Id of the freshly issued invitation. `None` when issuance was
    /// skipped because the address already has coverage.
    pub invitation_id: Option<InvitationId>,

    /// True when the member email already had an active covering
    /// subscription and no invitation was issued.
    pub already_subscribed: bool,

    /// The invitee's user id when the email resolves to a registered
    /// account.
    pub member_user_id: Option<UserId>,
}

/// Handler for issuing family-group invitations.
///
/// Addresses already covered by an active subscription are skipped
/// without error. Inviting an email that never registered is an
/// expected case: the invitation email still goes out, addressed
/// without a display name, and no pending-invite marker is set.
/// Email delivery is best-effort and never fails the issuance.
pub struct AddFamilyMemberHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
    ledger: Arc<dyn InvitationLedger>,
    directory: Arc<dyn MemberDirectory>,
    pending_invites: Arc<dyn PendingInviteStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl AddFamilyMemberHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        ledger: Arc<dyn InvitationLedger>,
        directory: Arc<dyn MemberDirectory>,
        pending_invites: Arc<dyn PendingInviteStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            subscriptions,
            ledger,
            directory,
            pending_invites,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: AddFamilyMemberCommand,
    ) -> Result<AddFamilyMemberResult, FamilyGroupError> {
        // 1. Skip addresses that already have coverage
        let existing = self
            .subscriptions
            .find_active_by_email(&cmd.member_email)
            .await?;
        if existing.is_some() {
            return Ok(AddFamilyMemberResult {
                invitation_id: None,
                already_subscribed: true,
                member_user_id: None,
            });
        }

        // 2. Record the invitation
        let invitation = Invitation::issue(
            InvitationId::new(),
            cmd.owner_id,
            cmd.owner_email.clone(),
            cmd.owner_name.clone(),
            cmd.member_email.clone(),
        );
        self.ledger.insert(&invitation).await?;

        // 3. Resolve the invitee in the directory
        let profile = self.directory.find_by_email(&cmd.member_email).await?;

        // 4. Send the invitation email (best-effort)
        let sender = EmailContact::named(cmd.owner_name.clone(), cmd.owner_email.clone());
        let recipient = match &profile {
            Some(profile) => EmailContact::named(profile.name.clone(), profile.email.clone()),
            None => EmailContact::named("", cmd.member_email.clone()),
        };
        if let Err(err) = self.notifier.send_invitation(&sender, &recipient).await {
            error!(
                member_email = %cmd.member_email,
                error = %err,
                "Failed to send family group invitation email"
            );
        }

        // 5. Flag the pending invite on registered accounts
        let member_user_id = match profile {
            Some(profile) => {
                self.pending_invites.register(&profile.id).await?;
                Some(profile.id)
            }
            None => None,
        };

        Ok(AddFamilyMemberResult {
            invitation_id: Some(invitation.id),
            already_subscribed: false,
            member_user_id,
        })
    }
}
