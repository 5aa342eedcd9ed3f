//! In-memory record source.
//!
//! Holds records in maps and counts every port call, which lets tests assert
//! how many queries a report issued.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, MembershipId, MembershipPlanId, OrderId, SubscriptionId,
    Timestamp,
};
use crate::domain::reporting::{Membership, Order, Subscription, SubscriptionStatus};
use crate::ports::RecordSource;

/// Record source backed by process memory.
#[derive(Default)]
pub struct InMemoryRecordSource {
    subscriptions: RwLock<BTreeMap<SubscriptionId, Subscription>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    memberships: RwLock<BTreeMap<MembershipId, Membership>>,
    queries: AtomicUsize,
    failure: Option<DomainError>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.insert_subscription(subscription);
        self
    }

    pub fn with_order(self, order: Order) -> Self {
        self.insert_order(order);
        self
    }

    pub fn with_membership(self, membership: Membership) -> Self {
        self.insert_membership(membership);
        self
    }

    /// Makes every call fail with `error`.
    pub fn failing_with(mut self, error: DomainError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn insert_subscription(&self, subscription: Subscription) {
        if let Ok(mut subs) = self.subscriptions.write() {
            subs.insert(subscription.id, subscription);
        }
    }

    pub fn insert_order(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(order.id, order);
        }
    }

    pub fn insert_membership(&self, membership: Membership) {
        if let Ok(mut memberships) = self.memberships.write() {
            memberships.insert(membership.id, membership);
        }
    }

    /// Number of port calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> Result<(), DomainError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "In-memory record store lock poisoned")
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn list_subscription_ids(
        &self,
        status_filter: Option<&[SubscriptionStatus]>,
    ) -> Result<Vec<SubscriptionId>, DomainError> {
        self.begin_query()?;
        let subs = self.subscriptions.read().map_err(|_| poisoned())?;
        Ok(subs
            .values()
            .filter(|sub| status_filter.map_or(true, |statuses| statuses.contains(&sub.status)))
            .map(|sub| sub.id)
            .collect())
    }

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        self.begin_query()?;
        let subs = self.subscriptions.read().map_err(|_| poisoned())?;
        Ok(subs.get(&id).cloned())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        self.begin_query()?;
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    /// End dates are served separately by `get_membership_end_date`, so
    /// listed memberships come back open-ended.
    async fn list_active_memberships_for_plan(
        &self,
        plan_id: MembershipPlanId,
    ) -> Result<Vec<Membership>, DomainError> {
        self.begin_query()?;
        let memberships = self.memberships.read().map_err(|_| poisoned())?;
        Ok(memberships
            .values()
            .filter(|m| m.plan_id == plan_id && m.status.is_active())
            .map(|m| Membership {
                ends_at: None,
                ..m.clone()
            })
            .collect())
    }

    async fn get_membership_end_date(&self, id: MembershipId) -> Result<Option<Timestamp>, DomainError> {
        self.begin_query()?;
        let memberships = self.memberships.read().map_err(|_| poisoned())?;
        Ok(memberships.get(&id).and_then(|m| m.ends_at))
    }

    async fn find_active_or_pending_subscription_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<SubscriptionId>, DomainError> {
        self.begin_query()?;
        let subs = self.subscriptions.read().map_err(|_| poisoned())?;
        Ok(subs
            .values()
            .find(|sub| sub.customer_id == customer_id && sub.status.is_current_subscriber())
            .map(|sub| sub.id))
    }
}
