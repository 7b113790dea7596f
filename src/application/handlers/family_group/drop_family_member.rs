//! DropFamilyMemberHandler - Command handler for removing a member from a family group.
//!
//! Removal has two authorization shapes: the group owner evicting a
//! member (or an invited address that never registered), and a member
//! walking out of someone else's group on their own. Both delete the
//! ledger records and the group-set slot under one unit of work; only
//! owner-initiated removal notifies the member by email.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::family::{FamilyGroupError, GroupParticipant};
use crate::domain::foundation::{EmailAddress, UserId};
use crate::domain::member::MemberProfile;
use crate::ports::{
    EmailContact, GroupUnitOfWork, MemberDirectory, NotificationDispatcher, PendingInviteStore,
    SubscriptionStore,
};

/// Command to remove a member email from the acting user's perspective.
#[derive(Debug, Clone)]
pub struct DropFamilyMemberCommand {
    pub actor_id: UserId,
    pub member_email: EmailAddress,
}

/// Result of a removal.
#[derive(Debug, Clone)]
pub struct DropFamilyMemberResult {
    /// The membership that was removed. `None` when the email had no
    /// registered profile or nothing was authorized to change.
    pub removed: Option<GroupParticipant>,
}

/// Handler for removing family-group members.
pub struct DropFamilyMemberHandler {
    directory: Arc<dyn MemberDirectory>,
    subscriptions: Arc<dyn SubscriptionStore>,
    unit_of_work: Arc<dyn GroupUnitOfWork>,
    pending_invites: Arc<dyn PendingInviteStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl DropFamilyMemberHandler {
    pub fn new(
        directory: Arc<dyn MemberDirectory>,
        subscriptions: Arc<dyn SubscriptionStore>,
        unit_of_work: Arc<dyn GroupUnitOfWork>,
        pending_invites: Arc<dyn PendingInviteStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            directory,
            subscriptions,
            unit_of_work,
            pending_invites,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: DropFamilyMemberCommand,
    ) -> Result<DropFamilyMemberResult, FamilyGroupError> {
        // 1. Resolve the member being removed
        let member = match self.directory.find_by_email(&cmd.member_email).await? {
            Some(profile) => profile,
            None => {
                // Never-registered invitee: only invitation records exist
                self.drop_by_owner(&cmd.actor_id, &cmd.member_email, None, false)
                    .await?;
                return Ok(DropFamilyMemberResult { removed: None });
            }
        };

        // 2. Bookkeeping for the caller: which group this change affects
        let removed = self.participant_for(&cmd.actor_id, &member).await?;

        // 3. Pick the authorization path from the member's coverage
        let covering = self.subscriptions.find_covering(&member.id).await?;
        let owner_initiated = match &covering {
            Some(subscription) => subscription.owner_id == cmd.actor_id,
            None => true,
        };

        if owner_initiated {
            self.drop_by_owner(
                &cmd.actor_id,
                &cmd.member_email,
                Some(&member),
                covering.is_some(),
            )
            .await?;
            Ok(DropFamilyMemberResult { removed })
        } else {
            let authorized = self
                .drop_self(&cmd.actor_id, &cmd.member_email, &member)
                .await?;
            Ok(DropFamilyMemberResult {
                removed: if authorized { removed } else { None },
            })
        }
    }

    /// The participant record describing the affected membership, built
    /// from the acting user's own covering subscription.
    async fn participant_for(
        &self,
        actor_id: &UserId,
        member: &MemberProfile,
    ) -> Result<Option<GroupParticipant>, FamilyGroupError> {
        let covering = match self.subscriptions.find_covering(actor_id).await? {
            Some(subscription) => subscription,
            None => return Ok(None),
        };
        let owner = match self.directory.find_by_id(&covering.owner_id).await? {
            Some(profile) => profile,
            None => return Ok(None),
        };
        Ok(Some(GroupParticipant::new(
            member.id,
            member.email.clone(),
            owner.email,
        )))
    }

    /// Owner-initiated eviction: delete the pair's ledger records and
    /// the member's group slot, then clean the marker and notify.
    async fn drop_by_owner(
        &self,
        owner_id: &UserId,
        member_email: &EmailAddress,
        member: Option<&MemberProfile>,
        had_subscription: bool,
    ) -> Result<(), FamilyGroupError> {
        // The cancellation email names the owner
        let owner = self
            .directory
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| FamilyGroupError::user_not_found(*owner_id))?;

        let mut tx = self.unit_of_work.begin().await?;
        tx.delete_invitations_for_pair(owner_id, member_email)
            .await?;
        if let Some(member) = member {
            if let Some(mut subscription) = tx.find_subscription_by_owner(owner_id).await? {
                if subscription.remove_member(&member.id) {
                    tx.update_group_members(&subscription.id, &subscription.group)
                        .await?;
                }
            }
        }
        tx.commit().await?;

        // Post-commit side effects; a lost email never undoes the removal
        let contact = match member {
            Some(member) => {
                self.pending_invites.remove(&member.id).await?;
                EmailContact::named(member.name.clone(), member.email.clone())
            }
            None => EmailContact::bare(member_email.clone()),
        };
        if let Err(err) = self
            .notifier
            .send_membership_canceled(&owner.name, &contact, had_subscription)
            .await
        {
            error!(
                member_email = %member_email,
                error = %err,
                "Failed to send family group cancellation email"
            );
        }

        Ok(())
    }

    /// Self-initiated departure. Returns false when the actor is not
    /// the member, in which case nothing changes.
    async fn drop_self(
        &self,
        actor_id: &UserId,
        member_email: &EmailAddress,
        member: &MemberProfile,
    ) -> Result<bool, FamilyGroupError> {
        let actor = self.directory.find_by_id(actor_id).await?;
        let authorized = actor
            .map(|profile| &profile.email == member_email)
            .unwrap_or(false);
        if !authorized {
            debug!(
                actor_id = %actor_id,
                member_email = %member_email,
                "Ignoring removal request from a non-member actor"
            );
            return Ok(false);
        }

        let mut tx = self.unit_of_work.begin().await?;
        tx.delete_subscribed_invitation(member_email).await?;
        tx.remove_member_from_groups(&member.id).await?;
        tx.commit().await?;

        Ok(true)
    }
}
