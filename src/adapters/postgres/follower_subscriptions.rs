//! PostgreSQL implementation of FollowerSubscriptions.

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, UserId};
use crate::ports::FollowerSubscriptions;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of the FollowerSubscriptions port.
///
/// Follow rows written before accounts were keyed by id carry only the
/// teacher's email, so severing matches on either column.
pub struct PostgresFollowerSubscriptions {
    pool: PgPool,
}

impl PostgresFollowerSubscriptions {
    /// Creates a new PostgresFollowerSubscriptions with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowerSubscriptions for PostgresFollowerSubscriptions {
    async fn unsubscribe_from_teacher(
        &self,
        teacher_id: &UserId,
        teacher_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM teacher_followers
            WHERE teacher_id = $1 OR teacher_email = $2
            "#,
        )
        .bind(teacher_id.as_uuid())
        .bind(teacher_email.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to remove follower subscriptions: {}", e),
            )
        })?;

        Ok(())
    }
}
