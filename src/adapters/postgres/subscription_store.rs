//! PostgreSQL implementation of SubscriptionStore.
//!
//! Read-side lookups against `subscriptions`. Group member sets are
//! stored as a uuid array; writes to them happen only through the
//! unit-of-work adapter.

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::{GroupKind, Subscription, SubscriptionKind};
use crate::ports::SubscriptionStore;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the SubscriptionStore port.
pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    /// Creates a new PostgresSubscriptionStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
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
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            kind: parse_kind(&row.kind)?,
            group_kind: parse_group_kind(&row.group_kind)?,
            active: row.active,
            group: row.group_members.into_iter().map(UserId::from_uuid).collect(),
        })
    }
}

fn parse_kind(s: &str) -> Result<SubscriptionKind, DomainError> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(SubscriptionKind::Monthly),
        "annual" => Ok(SubscriptionKind::Annual),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid kind value: {}", s),
        )),
    }
}

fn parse_group_kind(s: &str) -> Result<GroupKind, DomainError> {
    match s.to_lowercase().as_str() {
        "single" => Ok(GroupKind::Single),
        "family" => Ok(GroupKind::Family),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid group kind value: {}", s),
        )),
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.owner_id, s.kind, s.group_kind, s.active, s.group_members
            FROM subscriptions s
            JOIN users u ON u.email = $1
            WHERE s.active AND (s.owner_id = u.id OR u.id = ANY(s.group_members))
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_covering(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        // Owned subscriptions win over group membership
        if let Some(owned) = self.find_by_owner(user_id).await? {
            return Ok(Some(owned));
        }

        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, kind, group_kind, active, group_members
            FROM subscriptions
            WHERE active AND $1 = ANY(group_members)
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, kind, group_kind, active, group_members
            FROM subscriptions
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind_works_for_all_values() {
        assert_eq!(parse_kind("monthly").unwrap(), SubscriptionKind::Monthly);
        assert_eq!(parse_kind("annual").unwrap(), SubscriptionKind::Annual);
        assert_eq!(parse_kind("Monthly").unwrap(), SubscriptionKind::Monthly);
    }

    #[test]
    fn parse_kind_rejects_invalid_values() {
        assert!(parse_kind("weekly").is_err());
        assert!(parse_kind("").is_err());
    }

    #[test]
    fn parse_group_kind_works_for_all_values() {
        assert_eq!(parse_group_kind("single").unwrap(), GroupKind::Single);
        assert_eq!(parse_group_kind("family").unwrap(), GroupKind::Family);
    }

    #[test]
    fn parse_group_kind_rejects_invalid_values() {
        assert!(parse_group_kind("team").is_err());
    }

    #[test]
    fn row_converts_to_subscription() {
        let members = vec![Uuid::new_v4(), Uuid::new_v4()];
        let row = SubscriptionRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: "monthly".to_string(),
            group_kind: "family".to_string(),
            active: true,
            group_members: members.clone(),
        };

        let subscription = Subscription::try_from(row).unwrap();
        assert!(subscription.is_family_group());
        assert_eq!(subscription.group.len(), 2);
        assert!(subscription.contains_member(&UserId::from_uuid(members[0])));
    }
}
