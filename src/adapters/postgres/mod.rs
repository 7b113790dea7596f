//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresMemberDirectory` - Account profile lookups
//! - `PostgresInvitationLedger` - Family invitation records
//! - `PostgresSubscriptionStore` - Subscription and group-set reads
//! - `PostgresGroupUnitOfWork` - Transactional membership transitions
//! - `PostgresPendingInviteStore` - Open-invite markers
//! - `PostgresClosedNoticeStore` - Group-closed notices
//! - `PostgresFollowerSubscriptions` - Teacher-follow cleanup on closure

mod closed_notice_store;
mod follower_subscriptions;
mod group_unit_of_work;
mod invitation_ledger;
mod member_directory;
mod pending_invite_store;
mod subscription_store;

pub use closed_notice_store::PostgresClosedNoticeStore;
pub use follower_subscriptions::PostgresFollowerSubscriptions;
pub use group_unit_of_work::PostgresGroupUnitOfWork;
pub use invitation_ledger::PostgresInvitationLedger;
pub use member_directory::PostgresMemberDirectory;
pub use pending_invite_store::PostgresPendingInviteStore;
pub use subscription_store::PostgresSubscriptionStore;

use crate::config::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Builds a connection pool from the database configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies pending schema migrations from the `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
