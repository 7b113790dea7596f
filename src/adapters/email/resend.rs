//! Resend mailer adapter.
//!
//! Implements the `NotificationDispatcher` trait against the Resend
//! HTTP API. Owns the three family-group templates; callers hand over
//! typed contacts and the adapter renders subject and body.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::from_config(&app_config.email);
//! let mailer = ResendNotificationAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::domain::foundation::EmailAddress;
use crate::ports::{EmailContact, NotificationDispatcher, NotificationError};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key (re_...).
    api_key: SecretString,

    /// Rendered "From" header, e.g. `Family Groups <noreply@...>`.
    from_header: String,

    /// Base URL for the Resend API (default: https://api.resend.com).
    api_base_url: String,

    /// Page where invitees answer their open invitations.
    invites_url: String,
}

impl ResendConfig {
    /// Create a new Resend configuration.
    pub fn new(api_key: impl Into<String>, from_header: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from_header: from_header.into(),
            api_base_url: "https://api.resend.com".to_string(),
            invites_url: "https://familygroups.app/invitations".to_string(),
        }
    }

    /// Build the adapter configuration from the application email config.
    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            api_key: SecretString::new(config.resend_api_key.clone()),
            from_header: config.from_header(),
            api_base_url: "https://api.resend.com".to_string(),
            invites_url: config.invites_url.clone(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the invitation landing page.
    pub fn with_invites_url(mut self, url: impl Into<String>) -> Self {
        self.invites_url = url.into();
        self
    }
}

/// Resend mailer adapter.
///
/// Implements `NotificationDispatcher` for the Resend API.
pub struct ResendNotificationAdapter {
    config: ResendConfig,
    http_client: reqwest::Client,
}

/// JSON body for the Resend send-email endpoint.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Response from the Resend send-email endpoint.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SendEmailResponse {
    id: String,
}

impl ResendNotificationAdapter {
    /// Create a new Resend adapter with the given configuration.
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn send_email(
        &self,
        to: &EmailAddress,
        subject: &str,
        html: &str,
    ) -> Result<(), NotificationError> {
        let url = format!("{}/emails", self.config.api_base_url);

        let request = SendEmailRequest {
            from: &self.config.from_header,
            to: [to.as_str()],
            subject,
            html,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, error = %error_text, "Resend send failed");

        // Rate limits and server faults are worth retrying; the rest is
        // a rejected payload.
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NotificationError::transport(format!(
                "Resend API error: {}",
                error_text
            )));
        }

        Err(NotificationError::delivery(format!(
            "Resend API error: {}",
            error_text
        )))
    }
}

#[async_trait]
impl NotificationDispatcher for ResendNotificationAdapter {
    async fn send_invitation(
        &self,
        sender: &EmailContact,
        recipient: &EmailContact,
    ) -> Result<(), NotificationError> {
        let subject = format!("{} invited you to their family group", sender.name);
        let html = invitation_body(sender, recipient, &self.config.invites_url);

        self.send_email(&recipient.email, &subject, &html).await
    }

    async fn send_membership_canceled(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
        had_subscription: bool,
    ) -> Result<(), NotificationError> {
        let subject = if had_subscription {
            "Your family group membership has ended"
        } else {
            "Your family group invitation was withdrawn"
        };
        let html = membership_canceled_body(group_owner_name, member, had_subscription);

        self.send_email(&member.email, subject, &html).await
    }

    async fn send_group_closed(
        &self,
        group_owner_name: &str,
        member: &EmailContact,
    ) -> Result<(), NotificationError> {
        let subject = format!("{}'s family group has closed", group_owner_name);
        let html = group_closed_body(group_owner_name, member);

        self.send_email(&member.email, &subject, &html).await
    }
}

fn greeting(contact: &EmailContact) -> String {
    if contact.name.is_empty() {
        "Hi,".to_string()
    } else {
        format!("Hi {},", contact.name)
    }
}

fn invitation_body(sender: &EmailContact, recipient: &EmailContact, invites_url: &str) -> String {
    format!(
        "<p>{}</p>\
         <p>{} ({}) invited you to join their family group. Members of a \
         family group share one subscription.</p>\
         <p><a href=\"{}\">View your invitation</a> to accept or decline.</p>",
        greeting(recipient),
        sender.name,
        sender.email.as_str(),
        invites_url
    )
}

fn membership_canceled_body(
    group_owner_name: &str,
    member: &EmailContact,
    had_subscription: bool,
) -> String {
    let detail = if had_subscription {
        "Your membership and the subscription that came with it have ended."
    } else {
        "The open invitation you received is no longer valid."
    };

    format!(
        "<p>{}</p>\
         <p>{} removed you from their family group. {}</p>",
        greeting(member),
        group_owner_name,
        detail
    )
}

fn group_closed_body(group_owner_name: &str, member: &EmailContact) -> String {
    format!(
        "<p>{}</p>\
         <p>{}'s family group has closed, so your membership through it \
         has ended. You can subscribe on your own account to keep \
         access.</p>",
        greeting(member),
        group_owner_name
    )
}
