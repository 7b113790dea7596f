//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - PostgreSQL-backed persistence
//! - `email` - Resend mailer and a recording mock
//! - `memory` - In-memory store for tests and development

pub mod email;
pub mod memory;
pub mod postgres;
