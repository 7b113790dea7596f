//! Integration tests for the family-group membership lifecycle.
//!
//! These tests verify the end-to-end flows:
//! 1. Owner issues an invitation, invitee accepts, group set gains the member
//! 2. Accepting a second invitation moves the member between groups atomically
//! 3. Owner- and self-initiated removal clean ledger, group set, and markers
//! 4. Group closure notifies members and leaves one durable notice each
//!
//! Uses the in-memory store and mock mailer to run the real handlers
//! without external dependencies.

use std::sync::Arc;

use family_groups::adapters::email::{MockNotificationDispatcher, SentEmail};
use family_groups::adapters::memory::InMemoryFamilyStore;
use family_groups::application::{
    AcceptInvitationCommand, AcceptInvitationHandler, AddFamilyMemberCommand,
    AddFamilyMemberHandler, CloseFamilyGroupCommand, CloseFamilyGroupHandler,
    DeclineInvitationCommand, DeclineInvitationHandler, DropFamilyMemberCommand,
    DropFamilyMemberHandler, DropGroupClosedMessageCommand, DropGroupClosedMessageHandler,
    GetGroupClosedMessageHandler, GetGroupClosedMessageQuery, ListFamilyMembersHandler,
    ListFamilyMembersQuery, RenewInvitationCommand, RenewInvitationHandler,
};
use family_groups::domain::foundation::{EmailAddress, InvitationId, SubscriptionId, UserId};
use family_groups::domain::invitation::{Invitation, InvitationStatus};
use family_groups::domain::member::MemberProfile;
use family_groups::domain::subscription::{Subscription, SubscriptionKind};
use family_groups::ports::{GroupUnitOfWork, PendingInviteStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// One shared store and mailer behind every handler under test.
struct TestApp {
    store: Arc<InMemoryFamilyStore>,
    mailer: Arc<MockNotificationDispatcher>,
}

impl TestApp {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryFamilyStore::new()),
            mailer: Arc::new(MockNotificationDispatcher::new()),
        }
    }

    fn add_member_handler(&self) -> AddFamilyMemberHandler {
        AddFamilyMemberHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.mailer.clone(),
        )
    }

    fn accept_handler(&self) -> AcceptInvitationHandler {
        AcceptInvitationHandler::new(self.store.clone(), self.store.clone())
    }

    fn decline_handler(&self) -> DeclineInvitationHandler {
        DeclineInvitationHandler::new(self.store.clone())
    }

    fn renew_handler(&self) -> RenewInvitationHandler {
        RenewInvitationHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.mailer.clone(),
        )
    }

    fn drop_member_handler(&self) -> DropFamilyMemberHandler {
        DropFamilyMemberHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.mailer.clone(),
        )
    }

    fn close_group_handler(&self) -> CloseFamilyGroupHandler {
        CloseFamilyGroupHandler::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.mailer.clone(),
        )
    }

    fn roster_handler(&self) -> ListFamilyMembersHandler {
        ListFamilyMembersHandler::new(self.store.clone(), self.store.clone())
    }

    fn notice_handlers(&self) -> (GetGroupClosedMessageHandler, DropGroupClosedMessageHandler) {
        (
            GetGroupClosedMessageHandler::new(self.store.clone()),
            DropGroupClosedMessageHandler::new(self.store.clone()),
        )
    }

    /// Registers a profile and returns it.
    fn register(&self, name: &str, addr: &str) -> MemberProfile {
        let profile = MemberProfile::new(UserId::new(), email(addr), name);
        self.store.add_profile(profile.clone());
        profile
    }

    /// Seeds an active monthly family subscription for the owner.
    fn family_subscription(&self, owner: &MemberProfile) {
        self.store.add_subscription(Subscription::new_family(
            SubscriptionId::new(),
            owner.id,
            SubscriptionKind::Monthly,
        ));
    }

    /// Seeds an approved, subscribed membership: the ledger record plus
    /// the member's slot in the owner's group set.
    async fn seed_membership(&self, owner: &MemberProfile, member: &MemberProfile) -> InvitationId {
        let mut invitation = Invitation::issue(
            InvitationId::new(),
            owner.id,
            owner.email.clone(),
            owner.name.clone(),
            member.email.clone(),
        );
        invitation.approve().unwrap();
        let id = invitation.id;
        self.store.add_invitation(invitation);

        let mut subscription = self
            .store
            .subscriptions()
            .into_iter()
            .find(|s| s.owner_id == owner.id)
            .expect("owner must have a seeded subscription");
        subscription.admit(member.id);

        let mut tx = self.store.begin().await.unwrap();
        tx.update_group_members(&subscription.id, &subscription.group)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        id
    }
}

fn email(addr: &str) -> EmailAddress {
    EmailAddress::new(addr).unwrap()
}

// =============================================================================
// Integration Tests
// =============================================================================

/// Tests the complete issue-then-accept flow: the invitation lands in
/// the ledger with a pending marker and an email, and acceptance puts
/// the member into the owner's group set.
#[tokio::test]
async fn issued_invitation_accepted_joins_the_group() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let member = app.register("Morgan Member", "member@example.com");

    // Owner invites the member
    let issued = app
        .add_member_handler()
        .handle(AddFamilyMemberCommand {
            owner_id: owner.id,
            owner_email: owner.email.clone(),
            owner_name: owner.name.clone(),
            member_email: member.email.clone(),
        })
        .await
        .unwrap();

    let invitation_id = issued.invitation_id.expect("invitation should be issued");
    assert!(!issued.already_subscribed);
    assert_eq!(issued.member_user_id, Some(member.id));
    assert!(app.store.pending_invites().contains(&member.id));
    assert!(matches!(app.mailer.sent()[0], SentEmail::Invitation { .. }));

    // Member accepts
    let accepted = app
        .accept_handler()
        .handle(AcceptInvitationCommand {
            member_id: member.id,
            member_email: member.email.clone(),
            invitation_id,
        })
        .await
        .unwrap();

    let joined = accepted.joined.expect("member should join the group");
    assert_eq!(joined.group_owner_email, owner.email);
    assert!(accepted.left.is_none());

    let records = app.store.invitations();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, InvitationStatus::Approved);
    assert!(records[0].subscribed);

    let subscriptions = app.store.subscriptions();
    assert!(subscriptions[0].contains_member(&member.id));
}

/// Tests that taking a second invitation is one atomic move: the old
/// group's record flips to declined, its set loses the member, and the
/// new group gains them, with exactly one subscribed record left.
#[tokio::test]
async fn accepting_a_second_invitation_moves_the_member_atomically() {
    let app = TestApp::new();
    let first_owner = app.register("First Owner", "first@example.com");
    app.family_subscription(&first_owner);
    let second_owner = app.register("Second Owner", "second@example.com");
    app.family_subscription(&second_owner);
    let member = app.register("Morgan Member", "member@example.com");
    app.seed_membership(&first_owner, &member).await;

    let second_invitation = Invitation::issue(
        InvitationId::new(),
        second_owner.id,
        second_owner.email.clone(),
        second_owner.name.clone(),
        member.email.clone(),
    );
    let second_id = second_invitation.id;
    app.store.add_invitation(second_invitation);

    let result = app
        .accept_handler()
        .handle(AcceptInvitationCommand {
            member_id: member.id,
            member_email: member.email.clone(),
            invitation_id: second_id,
        })
        .await
        .unwrap();

    assert_eq!(
        result.joined.unwrap().group_owner_email,
        second_owner.email
    );
    assert_eq!(result.left.unwrap().group_owner_email, first_owner.email);

    let subscriptions = app.store.subscriptions();
    let first_group = subscriptions
        .iter()
        .find(|s| s.owner_id == first_owner.id)
        .unwrap();
    let second_group = subscriptions
        .iter()
        .find(|s| s.owner_id == second_owner.id)
        .unwrap();
    assert!(!first_group.contains_member(&member.id));
    assert!(second_group.contains_member(&member.id));

    let subscribed: Vec<_> = app
        .store
        .invitations()
        .into_iter()
        .filter(|i| i.subscribed)
        .collect();
    assert_eq!(subscribed.len(), 1);
    assert_eq!(subscribed[0].id, second_id);
    assert_eq!(subscribed[0].status, InvitationStatus::Approved);

    let old_record = app
        .store
        .invitations()
        .into_iter()
        .find(|i| i.group_owner_id == first_owner.id)
        .unwrap();
    assert_eq!(old_record.status, InvitationStatus::Declined);
}

/// A full group still answers the invitation; only the set insertion is
/// skipped.
#[tokio::test]
async fn a_full_group_skips_the_set_insertion() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    for n in 0..5 {
        let filler = app.register(&format!("Filler {n}"), &format!("filler{n}@example.com"));
        app.seed_membership(&owner, &filler).await;
    }
    let member = app.register("Morgan Member", "member@example.com");

    let invitation = Invitation::issue(
        InvitationId::new(),
        owner.id,
        owner.email.clone(),
        owner.name.clone(),
        member.email.clone(),
    );
    let invitation_id = invitation.id;
    app.store.add_invitation(invitation);

    let result = app
        .accept_handler()
        .handle(AcceptInvitationCommand {
            member_id: member.id,
            member_email: member.email.clone(),
            invitation_id,
        })
        .await
        .unwrap();

    assert!(result.joined.is_none());

    let record = app
        .store
        .invitations()
        .into_iter()
        .find(|i| i.id == invitation_id)
        .unwrap();
    assert_eq!(record.status, InvitationStatus::Approved);

    let subscriptions = app.store.subscriptions();
    assert_eq!(subscriptions[0].group.len(), 5);
    assert!(!subscriptions[0].contains_member(&member.id));
}

#[tokio::test]
async fn declining_flips_the_record_and_nothing_else() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let member = app.register("Morgan Member", "member@example.com");
    let invitation = Invitation::issue(
        InvitationId::new(),
        owner.id,
        owner.email.clone(),
        owner.name.clone(),
        member.email.clone(),
    );
    let invitation_id = invitation.id;
    app.store.add_invitation(invitation);

    let result = app
        .decline_handler()
        .handle(DeclineInvitationCommand {
            invitation_id,
            member_email: member.email.clone(),
        })
        .await
        .unwrap();

    assert!(result.declined);
    assert_eq!(
        app.store.invitations()[0].status,
        InvitationStatus::Declined
    );
    assert!(app.store.subscriptions()[0].group.is_empty());

    // Declining again matches nothing
    let again = app
        .decline_handler()
        .handle(DeclineInvitationCommand {
            invitation_id,
            member_email: member.email.clone(),
        })
        .await
        .unwrap();
    assert!(!again.declined);
}

/// Renewal reopens a declined pair: back to new, marker re-registered,
/// email re-sent.
#[tokio::test]
async fn renewal_reopens_a_declined_invitation() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let member = app.register("Morgan Member", "member@example.com");
    let mut invitation = Invitation::issue(
        InvitationId::new(),
        owner.id,
        owner.email.clone(),
        owner.name.clone(),
        member.email.clone(),
    );
    invitation.decline().unwrap();
    app.store.add_invitation(invitation);

    let result = app
        .renew_handler()
        .handle(RenewInvitationCommand {
            owner_id: owner.id,
            owner_email: owner.email.clone(),
            owner_name: owner.name.clone(),
            member_email: member.email.clone(),
        })
        .await
        .unwrap();

    let renewed = result.invitation.expect("pair should be renewable");
    assert_eq!(renewed.status, InvitationStatus::New);
    assert!(!renewed.subscribed);
    assert!(app.store.pending_invites().contains(&member.id));
    assert!(matches!(app.mailer.sent()[0], SentEmail::Invitation { .. }));
}

/// Owner-initiated removal: ledger pair deleted, group slot freed,
/// marker cleaned, member mailed with the held-coverage variant.
#[tokio::test]
async fn owner_drop_removes_membership_and_notifies() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let member = app.register("Morgan Member", "member@example.com");
    app.seed_membership(&owner, &member).await;
    app.store.register(&member.id).await.unwrap();

    let result = app
        .drop_member_handler()
        .handle(DropFamilyMemberCommand {
            actor_id: owner.id,
            member_email: member.email.clone(),
        })
        .await
        .unwrap();

    let removed = result.removed.expect("removal should report the member");
    assert_eq!(removed.email, member.email);
    assert!(app.store.invitations().is_empty());
    assert!(app.store.subscriptions()[0].group.is_empty());
    assert!(!app.store.pending_invites().contains(&member.id));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(
        &sent[0],
        SentEmail::MembershipCanceled {
            had_subscription: true,
            ..
        }
    ));
}

/// Self-initiated departure deletes the subscribed record and the group
/// slot, and sends no email.
#[tokio::test]
async fn member_leaving_cleans_their_own_records() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let member = app.register("Morgan Member", "member@example.com");
    app.seed_membership(&owner, &member).await;

    let result = app
        .drop_member_handler()
        .handle(DropFamilyMemberCommand {
            actor_id: member.id,
            member_email: member.email.clone(),
        })
        .await
        .unwrap();

    assert!(result.removed.is_some());
    assert!(app.store.invitations().is_empty());
    assert!(app.store.subscriptions()[0].group.is_empty());
    assert!(app.mailer.sent().is_empty());
}

/// Group closure: every member mailed and left a durable notice, the
/// owner's follower relationship severed; a failing send loses only the
/// email.
#[tokio::test]
async fn closing_a_group_notifies_and_leaves_notices_despite_a_failing_send() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let mut members = Vec::new();
    for n in 0..3 {
        let member = app.register(&format!("Member {n}"), &format!("member{n}@example.com"));
        app.seed_membership(&owner, &member).await;
        members.push(member);
    }
    app.mailer.fail_recipient(members[1].email.clone());

    let result = app
        .close_group_handler()
        .handle(CloseFamilyGroupCommand {
            owner: owner.clone(),
        })
        .await;

    assert_eq!(result.members_notified, 2);
    assert_eq!(result.notices_saved, 3);
    assert_eq!(app.store.notices().len(), 3);
    assert_eq!(app.store.severed_teachers().len(), 1);
    assert_eq!(app.store.severed_teachers()[0].0, owner.id);

    // Every member can read their notice, then acknowledge it
    let (get_handler, drop_handler) = app.notice_handlers();
    for member in &members {
        let notice = get_handler
            .handle(GetGroupClosedMessageQuery {
                member_id: member.id,
            })
            .await
            .unwrap()
            .expect("each member should hold a notice");
        assert_eq!(notice.group_owner_email, owner.email);

        drop_handler
            .handle(DropGroupClosedMessageCommand {
                member_id: member.id,
            })
            .await
            .unwrap();
    }
    assert!(app.store.notices().is_empty());
}

/// The roster query sees the same state the commands produced.
#[tokio::test]
async fn roster_reflects_the_membership_lifecycle() {
    let app = TestApp::new();
    let owner = app.register("Alex Owner", "owner@example.com");
    app.family_subscription(&owner);
    let subscribed = app.register("Subscribed Member", "subscribed@example.com");
    app.seed_membership(&owner, &subscribed).await;

    // One open invitation to a registered account, one to a stranger
    let waiting = app.register("Waiting Member", "waiting@example.com");
    app.add_member_handler()
        .handle(AddFamilyMemberCommand {
            owner_id: owner.id,
            owner_email: owner.email.clone(),
            owner_name: owner.name.clone(),
            member_email: waiting.email.clone(),
        })
        .await
        .unwrap();
    app.add_member_handler()
        .handle(AddFamilyMemberCommand {
            owner_id: owner.id,
            owner_email: owner.email.clone(),
            owner_name: owner.name.clone(),
            member_email: email("stranger@example.com"),
        })
        .await
        .unwrap();

    let roster = app
        .roster_handler()
        .handle(ListFamilyMembersQuery { owner_id: owner.id })
        .await
        .unwrap();

    assert_eq!(roster.len(), 3);
    let subscribed_entry = roster
        .iter()
        .find(|e| e.email == subscribed.email)
        .unwrap();
    assert!(subscribed_entry.is_subscribed);
    let waiting_entry = roster.iter().find(|e| e.email == waiting.email).unwrap();
    assert!(waiting_entry.is_waiting);
    let stranger_entry = roster
        .iter()
        .find(|e| e.email == email("stranger@example.com"))
        .unwrap();
    assert!(stranger_entry.is_pending);
    assert!(stranger_entry.name.is_empty());
}
