//! PostgreSQL implementation of MemberDirectory.
//!
//! Read-only lookups against the `users` table. Account mutation lives
//! in the account-management service; this adapter never writes.

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp, UserId};
use crate::domain::member::MemberProfile;
use crate::ports::MemberDirectory;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the MemberDirectory port.
pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    /// Creates a new PostgresMemberDirectory with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user profile.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for MemberProfile {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stored email: {}", e),
            )
        })?;

        Ok(MemberProfile {
            id: UserId::from_uuid(row.id),
            email,
            name: row.name,
            deleted_at: row.deleted_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<MemberProfile>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, deleted_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find user: {}", e))
        })?;

        row.map(MemberProfile::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<MemberProfile>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, deleted_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find user: {}", e))
        })?;

        row.map(MemberProfile::try_from).transpose()
    }

    async fn find_all_by_emails(
        &self,
        emails: &[EmailAddress],
    ) -> Result<Vec<MemberProfile>, DomainError> {
        let emails: Vec<String> = emails.iter().map(|e| e.as_str().to_string()).collect();

        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, deleted_at
            FROM users
            WHERE email = ANY($1)
            ORDER BY name ASC
            "#,
        )
        .bind(&emails)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find users: {}", e))
        })?;

        rows.into_iter().map(MemberProfile::try_from).collect()
    }
}
