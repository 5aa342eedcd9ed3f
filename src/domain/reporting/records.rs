//! Source records consumed by the reporting engine.
//!
//! All records are immutable snapshots of what the record store holds at
//! report-generation time. Statuses are *current* statuses: there is no
//! history of what a subscription's status was during a past month.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CustomerId, MembershipId, MembershipPlanId, OrderId, SubscriptionId, Timestamp,
    ValidationError,
};

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    OnHold,
    PendingCancel,
    Cancelled,
    Expired,
    Switched,
    /// Any status outside the lifecycle above, such as a trashed record.
    ///
    /// Still contributes signup, cancellation, end and renewal events but is
    /// never counted as active or pending-cancel.
    Unknown,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 7] = [
        SubscriptionStatus::Pending,
        SubscriptionStatus::Active,
        SubscriptionStatus::OnHold,
        SubscriptionStatus::PendingCancel,
        SubscriptionStatus::Cancelled,
        SubscriptionStatus::Expired,
        SubscriptionStatus::Switched,
    ];

    /// Statuses that make a customer a current subscriber.
    ///
    /// Members holding a subscription in one of these states are not counted
    /// again as club members.
    pub const CURRENT_SUBSCRIBER: [SubscriptionStatus; 3] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::PendingCancel,
        SubscriptionStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::OnHold => "on-hold",
            SubscriptionStatus::PendingCancel => "pending-cancel",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Switched => "switched",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    /// Reads a stored status, mapping unrecognised values to `Unknown`.
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(status = raw, "Unrecognised subscription status");
            SubscriptionStatus::Unknown
        })
    }

    pub fn is_current_subscriber(&self) -> bool {
        Self::CURRENT_SUBSCRIBER.contains(self)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    /// Accepts both bare names and the `wc-` prefixed form stored by the shop.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let name = name.strip_prefix("wc-").unwrap_or(&name);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == name)
            .ok_or_else(|| {
                ValidationError::invalid_format("subscription_status", format!("unknown status '{}'", s))
            })
    }
}

/// A customer's recurring subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub status: SubscriptionStatus,
    pub customer_id: CustomerId,
    pub starts_at: Timestamp,
    pub next_payment_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    /// The signup order that created this subscription.
    pub parent_order_id: Option<OrderId>,
    pub renewal_order_ids: Vec<OrderId>,
}

impl Subscription {
    /// End of the paid access period.
    ///
    /// `None` for open-ended subscriptions with neither a next payment nor
    /// an end date.
    pub fn access_end(&self) -> Option<Timestamp> {
        self.next_payment_at.or(self.ends_at)
    }
}

/// A signup or renewal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Order total. Never negative.
    pub total: Decimal,
    pub created_at: Timestamp,
}

impl Order {
    pub fn new(id: OrderId, total: Decimal, created_at: Timestamp) -> Result<Self, ValidationError> {
        if total.is_sign_negative() && !total.is_zero() {
            return Err(ValidationError::invalid_format("order_total", "must not be negative"));
        }
        Ok(Self {
            id,
            total,
            created_at,
        })
    }
}

/// Lifecycle status of a club membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipStatus {
    Active,
    Complimentary,
    Pending,
    Delayed,
    Paused,
    Expired,
    Cancelled,
}

impl MembershipStatus {
    pub const ALL: [MembershipStatus; 7] = [
        MembershipStatus::Active,
        MembershipStatus::Complimentary,
        MembershipStatus::Pending,
        MembershipStatus::Delayed,
        MembershipStatus::Paused,
        MembershipStatus::Expired,
        MembershipStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Complimentary => "complimentary",
            MembershipStatus::Pending => "pending",
            MembershipStatus::Delayed => "delayed",
            MembershipStatus::Paused => "paused",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        *self == MembershipStatus::Active
    }
}

impl FromStr for MembershipStatus {
    type Err = ValidationError;

    /// Accepts both bare names and the `wcm-` prefixed form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let name = name.strip_prefix("wcm-").unwrap_or(&name);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == name)
            .ok_or_else(|| {
                ValidationError::invalid_format("membership_status", format!("unknown status '{}'", s))
            })
    }
}

/// A club membership granted under a membership plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub plan_id: MembershipPlanId,
    pub customer_id: CustomerId,
    pub status: MembershipStatus,
    /// Creation date of the membership.
    pub starts_at: Timestamp,
    /// Open-ended when absent.
    pub ends_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs).unwrap()
    }

    fn subscription() -> Subscription {
        Subscription {
            id: SubscriptionId::new(1).unwrap(),
            status: SubscriptionStatus::Active,
            customer_id: CustomerId::new(10).unwrap(),
            starts_at: ts(1_000),
            next_payment_at: None,
            ends_at: None,
            cancelled_at: None,
            parent_order_id: None,
            renewal_order_ids: vec![],
        }
    }

    #[test]
    fn subscription_status_parses_prefixed_names() {
        assert_eq!("wc-active".parse(), Ok(SubscriptionStatus::Active));
        assert_eq!("wc-pending-cancel".parse(), Ok(SubscriptionStatus::PendingCancel));
        assert_eq!("on-hold".parse(), Ok(SubscriptionStatus::OnHold));
        assert!("wc-trashed".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn stored_status_falls_back_to_unknown() {
        assert_eq!(SubscriptionStatus::from_stored("wc-on-hold"), SubscriptionStatus::OnHold);
        assert_eq!(SubscriptionStatus::from_stored("trash"), SubscriptionStatus::Unknown);
        assert!(!SubscriptionStatus::Unknown.is_current_subscriber());
    }

    #[test]
    fn current_subscriber_statuses() {
        assert!(SubscriptionStatus::Active.is_current_subscriber());
        assert!(SubscriptionStatus::OnHold.is_current_subscriber());
        assert!(SubscriptionStatus::PendingCancel.is_current_subscriber());
        assert!(!SubscriptionStatus::Cancelled.is_current_subscriber());
        assert!(!SubscriptionStatus::Pending.is_current_subscriber());
    }

    #[test]
    fn membership_status_parses_prefixed_names() {
        assert_eq!("wcm-active".parse(), Ok(MembershipStatus::Active));
        assert_eq!("paused".parse(), Ok(MembershipStatus::Paused));
        assert!(!MembershipStatus::Complimentary.is_active());
    }

    #[test]
    fn access_end_prefers_next_payment_over_end_date() {
        let mut sub = subscription();
        assert_eq!(sub.access_end(), None);

        sub.ends_at = Some(ts(5_000));
        assert_eq!(sub.access_end(), Some(ts(5_000)));

        sub.next_payment_at = Some(ts(3_000));
        assert_eq!(sub.access_end(), Some(ts(3_000)));
    }

    #[test]
    fn order_rejects_negative_totals() {
        let id = OrderId::new(5).unwrap();
        assert!(Order::new(id, money("-0.01"), ts(0)).is_err());
        assert!(Order::new(id, money("0"), ts(0)).is_ok());
        assert!(Order::new(id, money("49.99"), ts(0)).is_ok());
    }
}
