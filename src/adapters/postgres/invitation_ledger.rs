//! PostgreSQL implementation of InvitationLedger.
//!
//! Single-document reads and writes against `family_invitations`.
//! Everything acceptance and removal touch transactionally goes through
//! the unit-of-work adapter instead.

use crate::domain::foundation::{
    DomainError, EmailAddress, ErrorCode, InvitationId, Timestamp, UserId,
};
use crate::domain::invitation::{Invitation, InvitationStatus};
use crate::ports::InvitationLedger;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the InvitationLedger port.
pub struct PostgresInvitationLedger {
    pool: PgPool,
}

impl PostgresInvitationLedger {
    /// Creates a new PostgresInvitationLedger with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an invitation record.
#[derive(Debug, sqlx::FromRow)]
struct InvitationRow {
    id: Uuid,
    group_owner_id: Uuid,
    group_owner_email: String,
    group_owner_name: String,
    group_member_email: String,
    status: String,
    subscribed: bool,
    processed_at: DateTime<Utc>,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = DomainError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let group_owner_email = parse_email(row.group_owner_email)?;
        let group_member_email = parse_email(row.group_member_email)?;

        Ok(Invitation {
            id: InvitationId::from_uuid(row.id),
            group_owner_id: UserId::from_uuid(row.group_owner_id),
            group_owner_email,
            group_owner_name: row.group_owner_name,
            group_member_email,
            status,
            subscribed: row.subscribed,
            processed_at: Timestamp::from_datetime(row.processed_at),
        })
    }
}

fn parse_email(s: String) -> Result<EmailAddress, DomainError> {
    EmailAddress::new(s).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid stored email: {}", e),
        )
    })
}

fn parse_status(s: &str) -> Result<InvitationStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "new" => Ok(InvitationStatus::New),
        "approved" => Ok(InvitationStatus::Approved),
        "declined" => Ok(InvitationStatus::Declined),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn status_to_string(status: &InvitationStatus) -> &'static str {
    match status {
        InvitationStatus::New => "new",
        InvitationStatus::Approved => "approved",
        InvitationStatus::Declined => "declined",
    }
}

#[async_trait]
impl InvitationLedger for PostgresInvitationLedger {
    async fn insert(&self, invitation: &Invitation) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO family_invitations (
                id, group_owner_id, group_owner_email, group_owner_name,
                group_member_email, status, subscribed, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invitation.id.as_uuid())
        .bind(invitation.group_owner_id.as_uuid())
        .bind(invitation.group_owner_email.as_str())
        .bind(&invitation.group_owner_name)
        .bind(invitation.group_member_email.as_str())
        .bind(status_to_string(&invitation.status))
        .bind(invitation.subscribed)
        .bind(invitation.processed_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert invitation: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &InvitationId) -> Result<Option<Invitation>, DomainError> {
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, group_owner_id, group_owner_email, group_owner_name,
                   group_member_email, status, subscribed, processed_at
            FROM family_invitations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find invitation: {}", e),
            )
        })?;

        row.map(Invitation::try_from).transpose()
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Invitation>, DomainError> {
        let rows: Vec<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, group_owner_id, group_owner_email, group_owner_name,
                   group_member_email, status, subscribed, processed_at
            FROM family_invitations
            WHERE group_owner_id = $1
            ORDER BY processed_at ASC
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find invitations: {}", e),
            )
        })?;

        rows.into_iter().map(Invitation::try_from).collect()
    }

    async fn find_new_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Vec<Invitation>, DomainError> {
        let rows: Vec<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, group_owner_id, group_owner_email, group_owner_name,
                   group_member_email, status, subscribed, processed_at
            FROM family_invitations
            WHERE group_member_email = $1 AND status = 'new'
            ORDER BY processed_at ASC
            "#,
        )
        .bind(email.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find invitations: {}", e),
            )
        })?;

        rows.into_iter().map(Invitation::try_from).collect()
    }

    async fn find_subscribed_for_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError> {
        // The partial unique index keeps this to at most one row
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, group_owner_id, group_owner_email, group_owner_name,
                   group_member_email, status, subscribed, processed_at
            FROM family_invitations
            WHERE group_member_email = $1 AND subscribed
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find invitation: {}", e),
            )
        })?;

        row.map(Invitation::try_from).transpose()
    }

    async fn decline(
        &self,
        id: &InvitationId,
        member_email: &EmailAddress,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE family_invitations
            SET status = 'declined', subscribed = FALSE, processed_at = $3
            WHERE id = $1 AND group_member_email = $2 AND status <> 'declined'
            "#,
        )
        .bind(id.as_uuid())
        .bind(member_email.as_str())
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to decline invitation: {}", e),
            )
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn renew_for_pair(
        &self,
        owner_id: &UserId,
        owner_email: &EmailAddress,
        member_email: &EmailAddress,
    ) -> Result<Option<Invitation>, DomainError> {
        // Declined records are refreshed; records already New keep their
        // original processed_at; subscribed records never match.
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            UPDATE family_invitations
            SET status = 'new',
                subscribed = FALSE,
                processed_at = CASE WHEN status = 'declined' THEN $4 ELSE processed_at END
            WHERE group_owner_id = $1
              AND group_owner_email = $2
              AND group_member_email = $3
              AND status <> 'approved'
            RETURNING id, group_owner_id, group_owner_email, group_owner_name,
                      group_member_email, status, subscribed, processed_at
            "#,
        )
        .bind(owner_id.as_uuid())
        .bind(owner_email.as_str())
        .bind(member_email.as_str())
        .bind(Timestamp::now().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to renew invitation: {}", e),
            )
        })?;

        row.map(Invitation::try_from).transpose()
    }
}
