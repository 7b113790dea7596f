//! AcceptInvitationHandler - Command handler for joining a family group.
//!
//! Acceptance is the consistency-critical transition: the member may
//! already be counted in another owner's group, and readers must never
//! observe them in two groups or in none while a move is in flight.
//! Every ledger and group-set mutation here stages inside one
//! transaction and commits together.

use std::sync::Arc;

use tracing::debug;

use crate::domain::family::{FamilyGroupError, GroupParticipant};
use crate::domain::foundation::{EmailAddress, InvitationId, UserId};
use crate::ports::{GroupUnitOfWork, InvitationLedger};

/// Command to accept an invitation on behalf of the acting member.
#[derive(Debug, Clone)]
pub struct AcceptInvitationCommand {
    pub member_id: UserId,
    pub member_email: EmailAddress,
    pub invitation_id: InvitationId,
}

/// Result of a successful acceptance.
#[derive(Debug, Clone)]
pub struct AcceptInvitationResult {
    /// The group the member joined. `None` when insertion was skipped
    /// because the group was full or the member was already counted.
    pub joined: Option<GroupParticipant>,

    /// The group the member left to take this invitation, if any.
    pub left: Option<GroupParticipant>,
}

/// Handler for accepting family-group invitations.
///
/// Declines every competing invitation for the member's email, pulls
/// the member out of whichever group currently counts them, approves
/// the target invitation, and admits the member into the new owner's
/// group set, all under one atomic unit of work.
pub struct AcceptInvitationHandler {
    ledger: Arc<dyn InvitationLedger>,
    unit_of_work: Arc<dyn GroupUnitOfWork>,
}

impl AcceptInvitationHandler {
    pub fn new(ledger: Arc<dyn InvitationLedger>, unit_of_work: Arc<dyn GroupUnitOfWork>) -> Self {
        Self {
            ledger,
            unit_of_work,
        }
    }

    pub async fn handle(
        &self,
        cmd: AcceptInvitationCommand,
    ) -> Result<AcceptInvitationResult, FamilyGroupError> {
        // 1. Capture the group the member is leaving, for the caller's bookkeeping
        let left = self
            .ledger
            .find_subscribed_for_email(&cmd.member_email)
            .await?
            .map(|current| {
                GroupParticipant::new(
                    cmd.member_id,
                    cmd.member_email.clone(),
                    current.group_owner_email,
                )
            });

        // 2. Everything from here to the commit is one atomic transition
        let mut tx = self.unit_of_work.begin().await?;

        // 3. Load the target invitation and verify it is addressed to the caller
        let mut invitation = tx
            .find_invitation(&cmd.invitation_id)
            .await?
            .ok_or_else(|| FamilyGroupError::invitation_not_found(cmd.invitation_id))?;
        if !invitation.is_addressed_to(&cmd.member_email) {
            return Err(FamilyGroupError::foreign_invitation(
                cmd.invitation_id,
                cmd.member_id,
            ));
        }

        // 4. Leave the current group: decline its invitation and pull the
        //    member id out of every group set holding it
        tx.decline_subscribed_invitations(&cmd.member_email, &cmd.invitation_id)
            .await?;
        tx.remove_member_from_groups(&cmd.member_id).await?;

        // 5. Decline every other open invitation for this email
        tx.decline_pending_invitations(&cmd.member_email, &cmd.invitation_id)
            .await?;

        // 6. Approve the target; re-accepting the current membership is a no-op
        if !invitation.is_subscribed() {
            invitation.approve().map_err(|e| {
                FamilyGroupError::invalid_transition(
                    format!("{:?}", invitation.status),
                    e.to_string(),
                )
            })?;
            tx.update_invitation(&invitation).await?;
        }

        // 7. Admit the member into the new owner's group set
        let mut subscription = tx
            .find_subscription_by_owner(&invitation.group_owner_id)
            .await?
            .ok_or_else(|| {
                FamilyGroupError::subscription_not_found(invitation.group_owner_id)
            })?;

        let outcome = subscription.admit(cmd.member_id);
        let joined = if outcome.was_admitted() {
            tx.update_group_members(&subscription.id, &subscription.group)
                .await?;
            Some(GroupParticipant::new(
                cmd.member_id,
                cmd.member_email.clone(),
                invitation.group_owner_email.clone(),
            ))
        } else {
            debug!(
                member_id = %cmd.member_id,
                invitation_id = %cmd.invitation_id,
                outcome = ?outcome,
                "Skipped group insertion"
            );
            None
        };

        // 8. Commit, or everything above rolls back
        tx.commit().await?;

        Ok(AcceptInvitationResult { joined, left })
    }
}
