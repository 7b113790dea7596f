//! ListMemberInvitationsHandler - Query handler for a member's open invitations.

use std::sync::Arc;

use crate::domain::family::FamilyGroupError;
use crate::domain::foundation::EmailAddress;
use crate::domain::invitation::MemberInvitationView;
use crate::ports::InvitationLedger;

/// Query for the unanswered invitations addressed to a member.
#[derive(Debug, Clone)]
pub struct ListMemberInvitationsQuery {
    pub member_email: EmailAddress,
}

/// Result of an open-invitations query.
pub type ListMemberInvitationsResult = Vec<MemberInvitationView>;

/// Handler surfacing who has invited the acting member.
pub struct ListMemberInvitationsHandler {
    ledger: Arc<dyn InvitationLedger>,
}

impl ListMemberInvitationsHandler {
    pub fn new(ledger: Arc<dyn InvitationLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(
        &self,
        query: ListMemberInvitationsQuery,
    ) -> Result<ListMemberInvitationsResult, FamilyGroupError> {
        let invitations = self.ledger.find_new_for_email(&query.member_email).await?;
        Ok(invitations.iter().map(MemberInvitationView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, ErrorCode, InvitationId, UserId};
    use crate::domain::invitation::{Invitation, InvitationStatus};
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    struct MockInvitationLedger {
        invitations: Vec<Invitation>,
        fail_read: bool,
    }

    impl MockInvitationLedger {
        fn with_invitations(invitations: Vec<Invitation>) -> Self {
            Self {
                invitations,
                fail_read: false,
            }
        }

        fn failing() -> Self {
            Self {
                invitations: Vec::new(),
                fail_read: true,
            }
        }
    }

    #[async_trait]
    impl InvitationLedger for MockInvitationLedger {
        async fn insert(&self, _invitation: &Invitation) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: &InvitationId,
        ) -> Result<Option<Invitation>, DomainError> {
            Ok(self.invitations.iter().find(|i| &i.id == id).cloned())
        }

        async fn find_by_owner(&self, _owner_id: &UserId) -> Result<Vec<Invitation>, DomainError> {
            Ok(Vec::new())
        }

        async fn find_new_for_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Vec<Invitation>, DomainError> {
            if self.fail_read {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated read failure",
                ));
            }
            Ok(self
                .invitations
                .iter()
                .filter(|i| i.is_addressed_to(email) && i.status == InvitationStatus::New)
                .cloned()
                .collect())
        }

        async fn find_subscribed_for_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<Invitation>, DomainError> {
            Ok(None)
        }

        async fn decline(
            &self,
            _id: &InvitationId,
            _member_email: &EmailAddress,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn renew_for_pair(
            &self,
            _owner_id: &UserId,
            _owner_email: &EmailAddress,
            _member_email: &EmailAddress,
        ) -> Result<Option<Invitation>, DomainError> {
            Ok(None)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn member_email() -> EmailAddress {
        EmailAddress::new("member@example.com").unwrap()
    }

    fn invitation_from(owner_name: &str, member: EmailAddress) -> Invitation {
        Invitation::issue(
            InvitationId::new(),
            UserId::new(),
            EmailAddress::new(format!(
                "{}@example.com",
                owner_name.to_lowercase().replace(' ', ".")
            ))
            .unwrap(),
            owner_name.to_string(),
            member,
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn lists_open_invitations_for_the_member() {
        let first = invitation_from("First Owner", member_email());
        let second = invitation_from("Second Owner", member_email());
        let handler = ListMemberInvitationsHandler::new(Arc::new(
            MockInvitationLedger::with_invitations(vec![first.clone(), second]),
        ));

        let views = handler
            .handle(ListMemberInvitationsQuery {
                member_email: member_email(),
            })
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, first.id);
        assert_eq!(views[0].group_owner_name, "First Owner");
        assert_eq!(views[0].group_owner_email.as_str(), "first.owner@example.com");
    }

    #[tokio::test]
    async fn answered_invitations_are_not_surfaced() {
        let mut accepted = invitation_from("First Owner", member_email());
        accepted.approve().unwrap();
        let mut declined = invitation_from("Second Owner", member_email());
        declined.decline().unwrap();
        let handler = ListMemberInvitationsHandler::new(Arc::new(
            MockInvitationLedger::with_invitations(vec![accepted, declined]),
        ));

        let views = handler
            .handle(ListMemberInvitationsQuery {
                member_email: member_email(),
            })
            .await
            .unwrap();

        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn other_members_invitations_stay_hidden() {
        let foreign = invitation_from(
            "First Owner",
            EmailAddress::new("someone.else@example.com").unwrap(),
        );
        let handler = ListMemberInvitationsHandler::new(Arc::new(
            MockInvitationLedger::with_invitations(vec![foreign]),
        ));

        let views = handler
            .handle(ListMemberInvitationsQuery {
                member_email: member_email(),
            })
            .await
            .unwrap();

        assert!(views.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fails_when_ledger_read_fails() {
        let handler =
            ListMemberInvitationsHandler::new(Arc::new(MockInvitationLedger::failing()));

        let result = handler
            .handle(ListMemberInvitationsQuery {
                member_email: member_email(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            FamilyGroupError::Infrastructure(_)
        ));
    }
}
