//! CloseFamilyGroupHandler - Command handler for dissolving a family group.
//!
//! Runs when the owner's subscription ends, as a best-effort teardown:
//! members get a "group closed" email and a durable notice for their
//! next login, and the owner's follower relationships are severed.
//! Nothing here may fail the cancellation that triggered it, so every
//! step logs and moves on instead of propagating errors.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error};

use crate::domain::family::GroupClosedNotice;
use crate::domain::foundation::UserId;
use crate::domain::member::MemberProfile;
use crate::ports::{
    ClosedNoticeStore, EmailContact, FollowerSubscriptions, MemberDirectory,
    NotificationDispatcher, SubscriptionStore,
};

/// Command to close the given owner's family group.
///
/// The caller already holds the owner's profile (closure runs inside
/// subscription-cancel and account-delete flows), so it is passed in
/// whole rather than re-fetched.
#[derive(Debug, Clone)]
pub struct CloseFamilyGroupCommand {
    pub owner: MemberProfile,
}

/// Tally of the teardown's best-effort steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseFamilyGroupResult {
    /// Members that received the group-closed email.
    pub members_notified: usize,

    /// Members that got a durable closed notice.
    pub notices_saved: usize,
}

/// Handler for family group closure.
pub struct CloseFamilyGroupHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
    directory: Arc<dyn MemberDirectory>,
    followers: Arc<dyn FollowerSubscriptions>,
    closed_notices: Arc<dyn ClosedNoticeStore>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl CloseFamilyGroupHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        directory: Arc<dyn MemberDirectory>,
        followers: Arc<dyn FollowerSubscriptions>,
        closed_notices: Arc<dyn ClosedNoticeStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            subscriptions,
            directory,
            followers,
            closed_notices,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: CloseFamilyGroupCommand) -> CloseFamilyGroupResult {
        // 1. The member set being dissolved
        let group = match self.subscriptions.find_by_owner(&cmd.owner.id).await {
            Ok(Some(subscription)) => subscription.group,
            Ok(None) => {
                debug!(owner_id = %cmd.owner.id, "No subscription to close a group for");
                return CloseFamilyGroupResult::default();
            }
            Err(err) => {
                error!(
                    owner_id = %cmd.owner.id,
                    error = %err,
                    "Failed to load the closing group"
                );
                return CloseFamilyGroupResult::default();
            }
        };

        // 2. Email every member; sends run concurrently and fail independently
        let sends = group
            .iter()
            .map(|member_id| self.notify_member(member_id, &cmd.owner.name));
        let members_notified = join_all(sends).await.into_iter().filter(|sent| *sent).count();

        // 3. Sever the owner's follower relationships, unless account
        //    teardown owns that cleanup already
        if !cmd.owner.is_deleted() {
            if let Err(err) = self
                .followers
                .unsubscribe_from_teacher(&cmd.owner.id, &cmd.owner.email)
                .await
            {
                error!(
                    owner_id = %cmd.owner.id,
                    error = %err,
                    "Failed to remove follower subscriptions for the closing group"
                );
            }
        }

        // 4. Leave a durable notice for each member id, resolved or not
        let saves = group
            .iter()
            .map(|member_id| self.leave_notice(member_id, &cmd.owner));
        let notices_saved = join_all(saves).await.into_iter().filter(|saved| *saved).count();

        CloseFamilyGroupResult {
            members_notified,
            notices_saved,
        }
    }

    async fn notify_member(&self, member_id: &UserId, owner_name: &str) -> bool {
        let profile = match self.directory.find_by_id(member_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                debug!(
                    member_id = %member_id,
                    "Skipping group-closed email for an unknown member id"
                );
                return false;
            }
            Err(err) => {
                error!(
                    member_id = %member_id,
                    error = %err,
                    "Failed to resolve a member of the closing group"
                );
                return false;
            }
        };

        let contact = EmailContact::named(profile.name, profile.email);
        match self.notifier.send_group_closed(owner_name, &contact).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    member_id = %member_id,
                    error = %err,
                    "Failed to send group-closed email"
                );
                false
            }
        }
    }

    async fn leave_notice(&self, member_id: &UserId, owner: &MemberProfile) -> bool {
        let notice = GroupClosedNotice::new(*member_id, owner.email.clone(), owner.name.clone());
        match self.closed_notices.save(&notice).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    member_id = %member_id,
                    error = %err,
                    "Failed to save group-closed notice"
                );
                false
            }
        }
    }
}
