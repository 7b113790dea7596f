//! PostgreSQL implementation of GroupUnitOfWork.
//!
//! Wraps one `sqlx` transaction spanning `family_invitations` and
//! `subscriptions`. Dropping the handle without committing rolls back,
//! which gives the acceptance and removal flows their all-or-nothing
//! membership transitions.

use crate::domain::foundation::{
    DomainError, EmailAddress, ErrorCode, InvitationId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::invitation::{Invitation, InvitationStatus};
use crate::domain::subscription::{GroupKind, Subscription, SubscriptionKind};
use crate::ports::{GroupTransaction, GroupUnitOfWork};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// PostgreSQL implementation of the GroupUnitOfWork port.
pub struct PostgresGroupUnitOfWork {
    pool: PgPool,
}

impl PostgresGroupUnitOfWork {
    /// Creates a new PostgresGroupUnitOfWork with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupUnitOfWork for PostgresGroupUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn GroupTransaction>, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to open transaction: {}", e),
            )
        })?;

        Ok(Box::new(PostgresGroupTransaction { tx }))
    }
}

/// One open transaction over the membership stores.
struct PostgresGroupTransaction {
    tx: Transaction<'static, Postgres>,
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
        Ok(Invitation {
            id: InvitationId::from_uuid(row.id),
            group_owner_id: UserId::from_uuid(row.group_owner_id),
            group_owner_email: parse_email(row.group_owner_email)?,
            group_owner_name: row.group_owner_name,
            group_member_email: parse_email(row.group_member_email)?,
            status: parse_status(&row.status)?,
            subscribed: row.subscribed,
            processed_at: Timestamp::from_datetime(row.processed_at),
        })
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    owner_id: Uuid,
    kind: String,
    group_kind: String,
    active: bool,
    group_members: Vec<Uuid>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.to_lowercase().as_str() {
            "monthly" => SubscriptionKind::Monthly,
            "annual" => SubscriptionKind::Annual,
            other => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid kind value: {}", other),
                ))
            }
        };
        let group_kind = match row.group_kind.to_lowercase().as_str() {
            "single" => GroupKind::Single,
            "family" => GroupKind::Family,
            other => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid group kind value: {}", other),
                ))
            }
        };

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            kind,
            group_kind,
            active: row.active,
            group: row.group_members.into_iter().map(UserId::from_uuid).collect(),
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

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl GroupTransaction for PostgresGroupTransaction {
    async fn find_invitation(
        &mut self,
        id: &InvitationId,
    ) -> Result<Option<Invitation>, DomainError> {
        // Row-locked so concurrent accepts of the same invitation serialize
        let row: Option<InvitationRow> = sqlx::query_as(
            r#"
            SELECT id, group_owner_id, group_owner_email, group_owner_name,
                   group_member_email, status, subscribed, processed_at
            FROM family_invitations
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to find invitation", e))?;

        row.map(Invitation::try_from).transpose()
    }

    async fn update_invitation(&mut self, invitation: &Invitation) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE family_invitations
            SET group_owner_id = $2,
                group_owner_email = $3,
                group_owner_name = $4,
                group_member_email = $5,
                status = $6,
                subscribed = $7,
                processed_at = $8
            WHERE id = $1
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
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to update invitation", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InvitationNotFound,
                "Invitation not found",
            ));
        }

        Ok(())
    }

    async fn decline_subscribed_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE family_invitations
            SET status = 'declined', subscribed = FALSE, processed_at = $3
            WHERE group_member_email = $1 AND subscribed AND id <> $2
            "#,
        )
        .bind(member_email.as_str())
        .bind(except.as_uuid())
        .bind(Timestamp::now().as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to decline subscribed invitations", e))?;

        Ok(result.rows_affected())
    }

    async fn decline_pending_invitations(
        &mut self,
        member_email: &EmailAddress,
        except: &InvitationId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE family_invitations
            SET status = 'declined', subscribed = FALSE, processed_at = $3
            WHERE group_member_email = $1 AND status = 'new' AND id <> $2
            "#,
        )
        .bind(member_email.as_str())
        .bind(except.as_uuid())
        .bind(Timestamp::now().as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to decline pending invitations", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_invitations_for_pair(
        &mut self,
        owner_id: &UserId,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM family_invitations WHERE group_owner_id = $1 AND group_member_email = $2",
        )
        .bind(owner_id.as_uuid())
        .bind(member_email.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to delete invitations", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_subscribed_invitation(
        &mut self,
        member_email: &EmailAddress,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM family_invitations WHERE group_member_email = $1 AND subscribed",
        )
        .bind(member_email.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to delete subscribed invitation", e))?;

        Ok(result.rows_affected())
    }

    async fn find_subscription_by_owner(
        &mut self,
        owner_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        // Row-locked: admit is a read-modify-write on the group set
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, kind, group_kind, active, group_members
            FROM subscriptions
            WHERE owner_id = $1
            FOR UPDATE
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn update_group_members(
        &mut self,
        subscription_id: &SubscriptionId,
        members: &[UserId],
    ) -> Result<(), DomainError> {
        let members: Vec<Uuid> = members.iter().map(|id| *id.as_uuid()).collect();

        let result = sqlx::query("UPDATE subscriptions SET group_members = $2 WHERE id = $1")
            .bind(subscription_id.as_uuid())
            .bind(&members)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("Failed to update group members", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }

    async fn remove_member_from_groups(
        &mut self,
        member_id: &UserId,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET group_members = array_remove(group_members, $1)
            WHERE active AND kind = 'monthly' AND group_kind = 'family'
              AND $1 = ANY(group_members)
            "#,
        )
        .bind(member_id.as_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to remove member from groups", e))?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_status_conversion() {
        for status in [
            InvitationStatus::New,
            InvitationStatus::Approved,
            InvitationStatus::Declined,
        ] {
            assert_eq!(parse_status(status_to_string(&status)).unwrap(), status);
        }
    }

    #[test]
    fn corrupt_subscription_row_is_rejected() {
        let row = SubscriptionRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: "weekly".to_string(),
            group_kind: "family".to_string(),
            active: true,
            group_members: Vec::new(),
        };

        assert!(Subscription::try_from(row).is_err());
    }
}
