//! In-memory family-group store.
//!
//! One shared state implementing every persistence port the family
//! flows touch. Useful for:
//! - Integration tests wiring real handlers end to end
//! - Development environments without a database
//!
//! Transactions take a snapshot of the state, stage mutations on the
//! snapshot, and publish it wholesale on commit. Dropping the handle
//! discards the snapshot. Writes racing a transaction through the
//! non-transactional ports are overwritten at commit, so this adapter
//! is not a fit for concurrent production use.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::family::GroupClosedNotice;
use crate::domain::foundation::{
    DomainError, EmailAddress, ErrorCode, InvitationId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::invitation::{Invitation, InvitationStatus};
use crate::domain::member::MemberProfile;
use crate::domain::subscription::Subscription;
use crate::ports::{
    ClosedNoticeStore, FollowerSubscriptions, GroupTransaction, GroupUnitOfWork, InvitationLedger,
    MemberDirectory, PendingInviteStore, SubscriptionStore,
};

/// Everything the family-group ports persist, in one clonable value.
#[derive(Debug, Default, Clone)]
struct FamilyState {
    profiles: Vec<MemberProfile>,
    invitations: Vec<Invitation>,
    subscriptions: Vec<Subscription>,
    pending_invites: HashSet<UserId>,
    notices: HashMap<UserId, GroupClosedNotice>,
    severed_teachers: Vec<(UserId, EmailAddress)>,
}

impl FamilyState {
    fn profile_by_email(&self, email: &EmailAddress) -> Option<&MemberProfile> {
        self.profiles.iter().find(|p| &p.email == email)
    }

    fn invitation_by_id(&self, id: &InvitationId) -> Option<&Invitation> {
        self.invitations.iter().find(|i| &i.id == id)
    }

    fn invitations_by_owner(&self, owner_id: &UserId) -> Vec<Invitation> {
        let mut found: Vec<Invitation> = self
            .invitations
            .iter()
            .filter(|i| &i.group_owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by_key(|i| *i.processed_at.as_datetime());
        found
    }

    fn decline_invitation(&mut self, id: &InvitationId, email: &EmailAddress) -> bool {
        let matched = self.invitations.iter_mut().find(|i| {
            &i.id == id && i.is_addressed_to(email) && i.status != InvitationStatus::Declined
        });

        match matched {
            Some(invitation) => {
                invitation.status = InvitationStatus::Declined;
                invitation.subscribed = false;
                invitation.processed_at = Timestamp::now();
                true
            }
            None => false,
        }
    }

    fn renew_pair(
        &mut self,
        owner_id: &UserId,
        owner_email: &EmailAddress,
        member_email: &EmailAddress,
    ) -> Option<Invitation> {
        let invitation = self.invitations.iter_mut().find(|i| {
            &i.group_owner_id == owner_id
                && &i.group_owner_email == owner_email
                && i.is_addressed_to(member_email)
                && i.status != InvitationStatus::Approved
        })?;

        if invitation.status == InvitationStatus::Declined {
            invitation.status = InvitationStatus::New;
            invitation.processed_at = Timestamp::now();
        }
        invitation.subscribed = false;

        Some(invitation.clone())
    }

    fn update_invitation(&mut self, updated: &Invitation) -> Result<(), DomainError> {
        match self.invitations.iter_mut().find(|i| i.id == updated.id) {
            Some(invitation) => {
                *invitation = updated.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::InvitationNotFound,
                "Invitation not found",
            )),
        }
    }

    fn decline_matching_except(
        &mut self,
        email: &EmailAddress,
        except: &InvitationId,
        matches: impl Fn(&Invitation) -> bool,
    ) -> u64 {
        let mut changed = 0;
        for invitation in self.invitations.iter_mut() {
            if invitation.is_addressed_to(email) && &invitation.id != except && matches(invitation)
            {
                invitation.status = InvitationStatus::Declined;
                invitation.subscribed = false;
                invitation.processed_at = Timestamp::now();
                changed += 1;
            }
        }
        changed
    }

    fn subscription_by_owner(&self, owner_id: &UserId) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| &s.owner_id == owner_id)
    }

    fn covering(&self, user_id: &UserId) -> Option<&Subscription> {
        // Owned subscriptions win over group membership
        self.subscription_by_owner(user_id).or_else(|| {
            self.subscriptions
                .iter()
                .find(|s| s.active && s.contains_member(user_id))
        })
    }

    fn update_group_members(
        &mut self,
        subscription_id: &SubscriptionId,
        members: &[UserId],
    ) -> Result<(), DomainError> {
        match self
            .subscriptions
            .iter_mut()
            .find(|s| &s.id == subscription_id)
        {
            Some(subscription) => {
                subscription.group = members.to_vec();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            )),
        }
    }

    fn remove_member_from_groups(&mut self, member_id: &UserId) -> u64 {
        let mut changed = 0;
        for subscription in self.subscriptions.iter_mut() {
            if subscription.is_family_group() && subscription.remove_member(member_id) {
                changed += 1;
            }
        }
        changed
    }
}

/// In-memory implementation of every family-group persistence port.
///
/// Thread-safe via internal `Mutex`. Does not persist data across
/// restarts.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryFamilyStore::new());
/// store.add_profile(owner_profile);
/// store.add_subscription(family_subscription);
///
/// let handler = AcceptInvitationHandler::new(
///     store.clone(), store.clone(), store.clone(), notifier,
/// );
/// ```
#[derive(Default)]
pub struct InMemoryFamilyStore {
    state: Arc<Mutex<FamilyState>>,
}

impl InMemoryFamilyStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a registered account.
    pub fn add_profile(&self, profile: MemberProfile) {
        self.state.lock().unwrap().profiles.push(profile);
    }

    /// Seeds an invitation record.
    pub fn add_invitation(&self, invitation: Invitation) {
        self.state.lock().unwrap().invitations.push(invitation);
    }

    /// Seeds a subscription.
    pub fn add_subscription(&self, subscription: Subscription) {
        self.state.lock().unwrap().subscriptions.push(subscription);
    }

    /// Snapshot of every invitation record.
    pub fn invitations(&self) -> Vec<Invitation> {
        self.state.lock().unwrap().invitations.clone()
    }

    /// Snapshot of every subscription.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.state.lock().unwrap().subscriptions.clone()
    }

    /// Snapshot of the pending-invite markers.
    pub fn pending_invites(&self) -> HashSet<UserId> {
        self.state.lock().unwrap().pending_invites.clone()
    }

    /// Snapshot of the unread group-closed notices.
    pub fn notices(&self) -> Vec<GroupClosedNotice> {
        self.state.lock().unwrap().notices.values().cloned().collect()
    }

    /// Teachers whose followers were unsubscribed, in call order.
    pub fn severed_teachers(&self) -> Vec<(UserId, EmailAddress)> {
        self.state.lock().unwrap().severed_teachers.clone()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryFamilyStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<MemberProfile>, DomainError> {
        Ok(self.state.lock().unwrap().profile_by_email(email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<MemberProfile>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| &p.id == id)
            .cloned())
    }

    async fn find_all_by_emails(
        &self,
        emails: &[EmailAddress],
    ) -> Result<Vec<MemberProfile>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<MemberProfile> = state
            .profiles
            .iter()
            .filter(|p| emails.contains(&p.email))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

#[async_trait]
impl InvitationLedger for InMemoryFamilyStore {
    async fn insert(&self, invitation: &Invitation) -> Result<(), DomainError> {
        self.state
            .lock()
            .unwrap()
            .invitations
            .push(invitation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError> {
        Ok(self.state.lock().unwrap().invitation_by_id(id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Invitation>, DomainError> {
        Ok(self.state.lock().unwrap().invitations_by_owner(owner_id))
    }

    async fn find_new_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<Invitation>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .invitations
            .iter()
            .filter(|i| i.is_addressed_to(email) && i.status == InvitationStatus::New)
            .cloned()
            .collect())
    }

    async fn find_subscribed_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .invitations
            .iter()
            .find(|i| i.is_addressed_to(email) && i.subscribed)
            .cloned())
    }

    async fn decline(
        &self,
        id: &InvitationId,
        member_email: &EmailAddress,
    ) -> Result<bool, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .decline_invitation(id, member_email))
    }

    async fn renew_for_pair(
        &self,
        owner_id: &UserId,
        owner_email: &EmailAddress,
        member_email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .renew_pair(owner_id, owner_email, member_email))
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryFamilyStore {
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscription>, DomainError> {
        let state = self.state.lock().unwrap();
        let Some(profile) = state.profile_by_email(email) else {
            return Ok(None);
        };
        let user_id = profile.id;
        Ok(state
            .subscriptions
            .iter()
            .find(|s| s.active && (s.owner_id == user_id || s.contains_member(&user_id)))
            .cloned())
    }

    async fn find_covering(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.state.lock().unwrap().covering(user_id).cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .subscription_by_owner(owner_id)
            .cloned())
    }
}

#[async_trait]
impl PendingInviteStore for InMemoryFamilyStore {
    async fn register(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.state.lock().unwrap().pending_invites.insert(*user_id);
        Ok(())
    }

    async fn remove(&self, user_id: &UserId) -> Result<(), DomainError> {
        self.state.lock().unwrap().pending_invites.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl ClosedNoticeStore for InMemoryFamilyStore {
    async fn save(&self, notice: &GroupClosedNotice) -> Result<(), DomainError> {
        self.state
            .lock()
            .unwrap()
            .notices
            .insert(notice.member_id, notice.clone());
        Ok(())
    }

    async fn get(&self, member_id: &UserId) -> Result<Option<GroupClosedNotice>, DomainError> {
        Ok(self.state.lock().unwrap().notices.get(member_id).cloned())
    }

    async fn delete(&self, member_id: &UserId) -> Result<(), DomainError> {
        self.state.lock().unwrap().notices.remove(member_id);
        Ok(())
    }
}

#[async_trait]
impl FollowerSubscriptions for InMemoryFamilyStore {
    async fn unsubscribe_from_teacher(
        &self,
        teacher_id: &UserId,
        teacher_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        self.state
            .lock()
            .unwrap()
            .severed_teachers
            .push((*teacher_id, teacher_email.clone()));
        Ok(())
    }
}

#[async_trait]
impl GroupUnitOfWork for InMemoryFamilyStore {
    async fn begin(&self) -> Result<Box<dyn GroupTransaction>, DomainError> {
        let staged = self.state.lock().unwrap().clone();
        Ok(Box::new(InMemoryGroupTransaction {
            staged,
            shared: Arc::clone(&self.state),
        }))
    }
}

/// Snapshot transaction over the shared state.
struct InMemoryGroupTransaction {
    staged: FamilyState,
    shared: Arc<Mutex<FamilyState>>,
}

#[async_trait]
impl GroupTransaction for InMemoryGroupTransaction {
    async fn find_invitation(
        &mut self,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError> {
        Ok(self.staged.invitation_by_id(id).cloned())
    }

    async fn update_invitation(&mut self, invitation: &Invitation) -> Result<(), DomainError> {
        self.staged.update_invitation(invitation)
    }

    async fn decline_subscribed_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError> {
        Ok(self
            .staged
            .decline_matching_except(member_email, except, |i| i.subscribed))
    }

    async fn decline_pending_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError> {
        Ok(self.staged.decline_matching_except(member_email, except, |i| {
            i.status == InvitationStatus::New
        }))
    }

    async fn delete_invitations_for_pair(
        &mut self,
        owner_id: &UserId,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError> {
        let before = self.staged.invitations.len();
        self.staged.invitations.retain(|i| {
            !(&i.group_owner_id == owner_id && i.is_addressed_to(member_email))
        });
        Ok((before - self.staged.invitations.len()) as u64)
    }

    async fn delete_subscribed_invitation(
        &mut self,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError> {
        let before = self.staged.invitations.len();
        self.staged
            .invitations
            .retain(|i| !(i.is_addressed_to(member_email) && i.subscribed));
        Ok((before - self.staged.invitations.len()) as u64)
    }

    async fn find_subscription_by_owner(
        &mut self,
        owner_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.staged.subscription_by_owner(owner_id).cloned())
    }

    async fn update_group_members(
        &mut self,
        subscription_id: &SubscriptionId,
        members: &[UserId],
    ) -> Result<(), DomainError> {
        self.staged.update_group_members(subscription_id, members)
    }

    async fn remove_member_from_groups(
        &mut self,
        member_id: &UserId,
    ) -> Result<u64, DomainError> {
        Ok(self.staged.remove_member_from_groups(member_id))
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        *self.shared.lock().unwrap() = self.staged;
        Ok(())
    }
}
