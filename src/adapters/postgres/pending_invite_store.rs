//! PostgreSQL implementation of PendingInviteStore.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::PendingInviteStore;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of the PendingInviteStore port.
///
/// One marker row per user; both operations are idempotent.
pub struct PostgresPendingInviteStore {
    pool: PgPool,
}

impl PostgresPendingInviteStore {
    /// Creates a new PostgresPendingInviteStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PendingInviteStore for PostgresPendingInviteStore {
    async fn register(&self, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO pending_invites (user_id, created_at)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to register pending invite: {}", e),
            )
        })?;

        Ok(())
    }

    async fn remove(&self, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM pending_invites WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to remove pending invite: {}", e),
                )
            })?;

        Ok(())
    }
}
