//! PostgreSQL implementation of RecordSource.
//!
//! Reads the shop tables created by `migrations/0001_reporting_schema.sql`.
//! Statuses are stored with their shop prefixes (`wc-active`, `wcm-active`).

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, MembershipId, MembershipPlanId, OrderId, SubscriptionId,
    Timestamp,
};
use crate::domain::reporting::{
    Membership, MembershipStatus, Order, Subscription, SubscriptionStatus,
};
use crate::ports::RecordSource;

/// Meta key holding a membership's end date.
const END_DATE_META_KEY: &str = "_end_date";

/// Storage format of `_end_date` values.
const END_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// PostgreSQL implementation of the RecordSource port.
pub struct PostgresRecordSource {
    pool: PgPool,
}

impl PostgresRecordSource {
    /// Creates a new PostgresRecordSource with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    status: String,
    customer_id: i64,
    starts_at: DateTime<Utc>,
    next_payment_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    parent_order_id: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    total: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: i64,
    plan_id: i64,
    customer_id: i64,
    status: String,
    created_at: DateTime<Utc>,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

fn invalid_record(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::InvalidRecord, e.to_string())
}

fn status_names(statuses: &[SubscriptionStatus]) -> Vec<String> {
    statuses.iter().map(|s| format!("wc-{}", s.as_str())).collect()
}

/// Parses a stored `_end_date`; blank or unparseable values mean open-ended.
fn parse_end_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDateTime::parse_from_str(raw, END_DATE_FORMAT) {
        Ok(naive) => Some(Timestamp::from_datetime(naive.and_utc())),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring unparseable membership end date");
            None
        }
    }
}

impl SubscriptionRow {
    fn into_subscription(self, renewal_order_ids: Vec<i64>) -> Result<Subscription, DomainError> {
        Ok(Subscription {
            id: SubscriptionId::new(self.id).map_err(invalid_record)?,
            status: SubscriptionStatus::from_stored(&self.status),
            customer_id: CustomerId::new(self.customer_id).map_err(invalid_record)?,
            starts_at: Timestamp::from_datetime(self.starts_at),
            next_payment_at: self.next_payment_at.map(Timestamp::from_datetime),
            ends_at: self.ends_at.map(Timestamp::from_datetime),
            cancelled_at: self.cancelled_at.map(Timestamp::from_datetime),
            parent_order_id: self
                .parent_order_id
                .filter(|id| *id > 0)
                .map(OrderId::new)
                .transpose()
                .map_err(invalid_record)?,
            renewal_order_ids: renewal_order_ids
                .into_iter()
                .map(OrderId::new)
                .collect::<Result<_, _>>()
                .map_err(invalid_record)?,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = OrderId::new(row.id).map_err(invalid_record)?;
        Order::new(id, row.total, Timestamp::from_datetime(row.created_at)).map_err(invalid_record)
    }
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: MembershipId::new(row.id).map_err(invalid_record)?,
            plan_id: MembershipPlanId::new(row.plan_id).map_err(invalid_record)?,
            customer_id: CustomerId::new(row.customer_id).map_err(invalid_record)?,
            status: row.status.parse::<MembershipStatus>().map_err(invalid_record)?,
            starts_at: Timestamp::from_datetime(row.created_at),
            ends_at: None,
        })
    }
}

#[async_trait]
impl RecordSource for PostgresRecordSource {
    async fn list_subscription_ids(
        &self,
        status_filter: Option<&[SubscriptionStatus]>,
    ) -> Result<Vec<SubscriptionId>, DomainError> {
        let ids: Vec<(i64,)> = match status_filter {
            None => sqlx::query_as::<_, (i64,)>("SELECT id FROM subscriptions ORDER BY id")
                .fetch_all(&self.pool)
                .await,
            Some(statuses) => sqlx::query_as::<_, (i64,)>(
                "SELECT id FROM subscriptions WHERE status = ANY($1) ORDER BY id",
            )
            .bind(status_names(statuses))
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| db_error("Failed to list subscriptions", e))?;

        ids.into_iter()
            .map(|(id,)| SubscriptionId::new(id).map_err(invalid_record))
            .collect()
    }

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, status, customer_id, starts_at, next_payment_at, ends_at,
                   cancelled_at, parent_order_id
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get subscription", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let renewals: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT order_id
            FROM subscription_renewal_orders
            WHERE subscription_id = $1
            ORDER BY order_id
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list renewal orders", e))?;

        row.into_subscription(renewals.into_iter().map(|(order_id,)| order_id).collect())
            .map(Some)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, total, created_at FROM shop_orders WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get order", e))?;

        row.map(Order::try_from).transpose()
    }

    async fn list_active_memberships_for_plan(
        &self,
        plan_id: MembershipPlanId,
    ) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT id, plan_id, customer_id, status, created_at
            FROM memberships
            WHERE plan_id = $1 AND status = 'wcm-active'
            ORDER BY id
            "#,
        )
        .bind(plan_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list memberships", e))?;

        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn get_membership_end_date(&self, id: MembershipId) -> Result<Option<Timestamp>, DomainError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT meta_value
            FROM membership_meta
            WHERE membership_id = $1 AND meta_key = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(END_DATE_META_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get membership end date", e))?;

        Ok(row.and_then(|(value,)| value).as_deref().and_then(parse_end_date))
    }

    async fn find_active_or_pending_subscription_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<SubscriptionId>, DomainError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM subscriptions
            WHERE customer_id = $1 AND status = ANY($2)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(customer_id.as_i64())
        .bind(status_names(&SubscriptionStatus::CURRENT_SUBSCRIBER))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find customer subscription", e))?;

        row.map(|(id,)| SubscriptionId::new(id).map_err(invalid_record))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_carry_shop_prefix() {
        assert_eq!(
            status_names(&SubscriptionStatus::CURRENT_SUBSCRIBER),
            vec!["wc-active", "wc-pending-cancel", "wc-on-hold"]
        );
    }

    #[test]
    fn end_date_parses_stored_format() {
        let ts = parse_end_date("2025-03-31 23:59:59").unwrap();
        assert_eq!(ts.as_datetime().to_rfc3339(), "2025-03-31T23:59:59+00:00");
    }

    #[test]
    fn blank_or_garbage_end_date_is_open_ended() {
        assert_eq!(parse_end_date(""), None);
        assert_eq!(parse_end_date("   "), None);
        assert_eq!(parse_end_date("0000-00-00 00:00:00"), None);
        assert_eq!(parse_end_date("next year"), None);
    }

    #[test]
    fn subscription_row_converts_with_renewals() {
        let row = SubscriptionRow {
            id: 4,
            status: "wc-pending-cancel".to_string(),
            customer_id: 9,
            starts_at: Utc::now(),
            next_payment_at: None,
            ends_at: None,
            cancelled_at: None,
            parent_order_id: Some(0),
        };

        let sub = row.into_subscription(vec![11, 12]).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::PendingCancel);
        assert_eq!(sub.parent_order_id, None);
        assert_eq!(sub.renewal_order_ids.len(), 2);
    }

    #[test]
    fn subscription_row_with_unrecognised_status_is_kept() {
        let row = SubscriptionRow {
            id: 5,
            status: "trash".to_string(),
            customer_id: 9,
            starts_at: Utc::now(),
            next_payment_at: None,
            ends_at: None,
            cancelled_at: None,
            parent_order_id: Some(10),
        };

        let sub = row.into_subscription(vec![11]).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Unknown);
        assert_eq!(sub.parent_order_id, Some(OrderId::new(10).unwrap()));
        assert_eq!(sub.renewal_order_ids, vec![OrderId::new(11).unwrap()]);
    }

    #[test]
    fn unknown_status_is_invalid_record() {
        let row = MembershipRow {
            id: 1,
            plan_id: 13981,
            customer_id: 9,
            status: "wcm-bogus".to_string(),
            created_at: Utc::now(),
        };

        let err = Membership::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRecord);
    }
}
