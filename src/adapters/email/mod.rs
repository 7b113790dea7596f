//! Email adapters - Mailer implementations for the notification port.
//!
//! This module provides notification dispatchers:
//! - `ResendNotificationAdapter` - Resend HTTP API mailer
//! - `MockNotificationDispatcher` - Recording mock for tests

mod mock;
mod resend;

pub use mock::{MockNotificationDispatcher, SentEmail};
pub use resend::{ResendConfig, ResendNotificationAdapter};
