//! Mock notification dispatcher for testing.
//!
//! Records every send instead of talking to a mail provider. Supports:
//! - Sent-mail inspection
//! - Error injection, globally or per recipient

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::EmailAddress;
use crate::ports::{EmailContact, NotificationDispatcher, NotificationError};

/// Mock notification dispatcher for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockNotificationDispatcher::new();
///
/// // Inject errors
/// mock.fail_recipient(EmailAddress::new("bounce@example.com")?);
///
/// // Inspect sends
/// assert_eq!(mock.sent().len(), 1);
/// ```
#[derive(Default)]
pub struct MockNotificationDispatcher {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Every delivered email, in send order.
    sent: Vec<SentEmail>,

    /// Fail every send.
    fail_all: bool,

    /// Fail sends to these recipients only.
    fail_recipients: Vec<EmailAddress>,
}

/// Recorded send for assertions.
#[derive(Debug, Clone)]
pub enum SentEmail {
    Invitation {
        sender: EmailContact,
        recipient: EmailContact,
    },
    MembershipCanceled {
        group_owner_name: String,
        member: EmailContact,
        had_subscription: bool,
    },
    GroupClosed {
        group_owner_name: String,
        member: EmailContact,
    },
}

impl SentEmail {
    /// Address the email was delivered to.
    pub fn recipient(&self) -> &EmailAddress {
        match self {
            SentEmail::Invitation { recipient, .. } => &recipient.email,
            SentEmail::MembershipCanceled { member, .. } => &member.email,
            SentEmail::GroupClosed { member, .. } => &member.email,
        }
    }
}

impl MockNotificationDispatcher {
    /// Create a new mock dispatcher that accepts every send.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every send.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().fail_all = true;
        mock
    }

    /// Fail sends addressed to this recipient.
    pub fn fail_recipient(&self, email: EmailAddress) {
        self.inner.lock().unwrap().fail_recipients.push(email);
    }

    /// Snapshot of every recorded send, in order.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Number of sends delivered to this address.
    pub fn sent_to(&self, email: &EmailAddress) -> usize {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|mail| mail.recipient() == email)
            .count()
    }

    fn record(&self, recipient: &EmailAddress, mail: SentEmail) -> Result<(), NotificationError> {
        let mut state = self.inner.lock().unwrap();

        if state.fail_all || state.fail_recipients.contains(recipient) {
            return Err(NotificationError::delivery("injected send failure"));
        }

        state.sent.push(mail);
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for MockNotificationDispatcher {
    async fn send_invitation(
        &self,
        sender: &EmailContact,
        recipient: &EmailContact,
    ) -> Result<(), NotificationError> {
        self.record(
            &recipient.email,
            SentEmail::Invitation {
                sender: sender.clone(),
                recipient: recipient.clone(),
            },
        )
    }

    async fn send_membership_canceled(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
        had_subscription: bool,
    ) -> Result<(), NotificationError> {
        self.record(
            &member.email,
            SentEmail::MembershipCanceled {
                group_owner_name: group_owner_name.to_string(),
                member: member.clone(),
                had_subscription,
            },
        )
    }

    async fn send_group_closed(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
    ) -> Result<(), NotificationError> {
        self.record(
            &member.email,
            SentEmail::GroupClosed {
                group_owner_name: group_owner_name.to_string(),
                member: member.clone(),
            },
        )
    }
}
