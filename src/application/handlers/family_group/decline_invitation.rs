//! DeclineInvitationHandler - Command handler for turning down an invitation.

use std::sync::Arc;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::{EmailAddress, InvitationId};
use crate::ports::InvitationLedger;

/// Command to decline an invitation addressed to the acting member.
#[derive(Debug, Clone)]
pub struct DeclineInvitationCommand {
    pub member_email: EmailAddress,
    pub invitation_id: InvitationId,
}

/// Result of a decline attempt.
#[derive(Debug, Clone)]
pub struct DeclineInvitationResult {
    /// True when a record matched both the id and the caller's email.
    pub declined: bool,
}

/// Handler for declining family-group invitations.
///
/// A single guarded ledger update: the caller's email must match the
/// record, so declining someone else's invitation silently matches
/// nothing. The member was never counted in the group, so no group set
/// is touched.
pub struct DeclineInvitationHandler {
    ledger: Arc<dyn InvitationLedger>,
}

impl DeclineInvitationHandler {
    pub fn new(ledger: Arc<dyn InvitationLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        cmd: DeclineInvitationCommand,
    ) -> Result<DeclineInvitationResult, FamilyGroupError> {
        let declined = self
            .ledger
            .decline(&cmd.invitation_id, &cmd.member_email)
            .await?;

        Ok(DeclineInvitationResult { declined })
    }
}
