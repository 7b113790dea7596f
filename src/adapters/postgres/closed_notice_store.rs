//! PostgreSQL implementation of ClosedNoticeStore.

use crate::domain::family::GroupClosedNotice;
use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp, UserId};
use crate::ports::ClosedNoticeStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the ClosedNoticeStore port.
///
/// `member_id` is the primary key, so a later closure overwrites an
/// unread earlier notice instead of stacking a second row.
pub struct PostgresClosedNoticeStore {
    pool: PgPool,
}

impl PostgresClosedNoticeStore {
    /// Creates a new PostgresClosedNoticeStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a closed-group notice.
#[derive(Debug, sqlx::FromRow)]
struct NoticeRow {
    member_id: Uuid,
    group_owner_email: String,
    group_owner_name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<NoticeRow> for GroupClosedNotice {
    type Error = DomainError;

    fn try_from(row: NoticeRow) -> Result<Self, Self::Error> {
        let group_owner_email = EmailAddress::new(row.group_owner_email).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored email: {}", e),
            )
        })?;

        Ok(GroupClosedNotice {
            member_id: UserId::from_uuid(row.member_id),
            group_owner_email,
            group_owner_name: row.group_owner_name,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl ClosedNoticeStore for PostgresClosedNoticeStore {
    async fn save(&self, notice: &GroupClosedNotice) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO group_closed_notices (member_id, group_owner_email, group_owner_name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (member_id) DO UPDATE SET
                group_owner_email = EXCLUDED.group_owner_email,
                group_owner_name = EXCLUDED.group_owner_name,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(notice.member_id.as_uuid())
        .bind(notice.group_owner_email.as_str())
        .bind(&notice.group_owner_name)
        .bind(notice.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save closed notice: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get(&self, member_id: &UserId) -> Result<Option<GroupClosedNotice>, DomainError> {
        let row: Option<NoticeRow> = sqlx::query_as(
            r#"
            SELECT member_id, group_owner_email, group_owner_name, created_at
            FROM group_closed_notices
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get closed notice: {}", e),
            )
        })?;

        row.map(GroupClosedNotice::try_from).transpose()
    }

    async fn delete(&self, member_id: &UserId) -> Result<(), DomainError> {
        // Idempotent: deleting an absent notice affects zero rows and succeeds
        sqlx::query("DELETE FROM group_closed_notices WHERE member_id = $1")
            .bind(member_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete closed notice: {}", e),
                )
            })?;

        Ok(())
    }
}
