//! Record source port (read side).
//!
//! Supplies the subscriptions, orders and memberships the reporting engine
//! aggregates over. Every method is a point query or a listing so that an
//! adapter can sit on top of any relational store.
//!
//! Absent records are `Ok(None)`; only infrastructure failures are errors.

use async_trait::async_trait;

use crate::domain::foundation::{
    CustomerId, DomainError, MembershipId, MembershipPlanId, OrderId, SubscriptionId, Timestamp,
};
use crate::domain::reporting::{Membership, Order, Subscription, SubscriptionStatus};

/// Read access to the shop's subscription and membership records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Lists subscription ids, optionally restricted to the given statuses.
    ///
    /// `None` returns subscriptions in every status.
    async fn list_subscription_ids(
        &self,
        status_filter: Option<&[SubscriptionStatus]>,
    ) -> Result<Vec<SubscriptionId>, DomainError>;

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Lists memberships in active status under `plan_id`.
    ///
    /// The returned records may lack an end date; resolve it with
    /// [`RecordSource::get_membership_end_date`].
    async fn list_active_memberships_for_plan(
        &self,
        plan_id: MembershipPlanId,
    ) -> Result<Vec<Membership>, DomainError>;

    /// End date stored for a membership, `None` when open-ended.
    async fn get_membership_end_date(
        &self,
        id: MembershipId,
    ) -> Result<Option<Timestamp>, DomainError>;

    /// Any subscription the customer currently holds in active,
    /// pending-cancel or on-hold status.
    async fn find_active_or_pending_subscription_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<SubscriptionId>, DomainError>;
}
