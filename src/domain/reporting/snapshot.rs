//! The batch-fetched record set one report invocation works from.

use std::collections::{HashMap, HashSet};

use super::records::{Membership, Order, Subscription};
use crate::domain::foundation::{CustomerId, OrderId};

/// Every record a report needs, fetched once and then read-only.
///
/// Orders that could not be resolved are simply absent; lookups for them
/// return `None` and the engine skips them.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    subscriptions: Vec<Subscription>,
    orders: HashMap<OrderId, Order>,
    memberships: Vec<Membership>,
    current_subscribers: HashSet<CustomerId>,
}

impl RecordSnapshot {
    /// Assembles a snapshot from already-resolved records.
    ///
    /// `current_subscribers` are customers who hold a subscription that is
    /// active, pending cancellation or on hold right now.
    pub fn new(
        subscriptions: Vec<Subscription>,
        orders: impl IntoIterator<Item = Order>,
        memberships: Vec<Membership>,
        current_subscribers: impl IntoIterator<Item = CustomerId>,
    ) -> Self {
        Self {
            subscriptions,
            orders: orders.into_iter().map(|order| (order.id, order)).collect(),
            memberships,
            current_subscribers: current_subscribers.into_iter().collect(),
        }
    }

    /// Assembles a snapshot, deriving current subscribers from the
    /// subscriptions' own statuses.
    pub fn from_records(
        subscriptions: Vec<Subscription>,
        orders: impl IntoIterator<Item = Order>,
        memberships: Vec<Membership>,
    ) -> Self {
        let current: Vec<CustomerId> = subscriptions
            .iter()
            .filter(|sub| sub.status.is_current_subscriber())
            .map(|sub| sub.customer_id)
            .collect();
        Self::new(subscriptions, orders, memberships, current)
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_current_subscriber(&self, customer_id: CustomerId) -> bool {
        self.current_subscribers.contains(&customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SubscriptionId, Timestamp};
    use crate::domain::reporting::SubscriptionStatus;

    fn subscription(id: i64, customer: i64, status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: SubscriptionId::new(id).unwrap(),
            status,
            customer_id: CustomerId::new(customer).unwrap(),
            starts_at: Timestamp::from_unix_secs(0).unwrap(),
            next_payment_at: None,
            ends_at: None,
            cancelled_at: None,
            parent_order_id: None,
            renewal_order_ids: vec![],
        }
    }

    #[test]
    fn from_records_derives_current_subscribers() {
        let snapshot = RecordSnapshot::from_records(
            vec![
                subscription(1, 10, SubscriptionStatus::OnHold),
                subscription(2, 20, SubscriptionStatus::Cancelled),
            ],
            vec![],
            vec![],
        );

        assert!(snapshot.is_current_subscriber(CustomerId::new(10).unwrap()));
        assert!(!snapshot.is_current_subscriber(CustomerId::new(20).unwrap()));
    }

    #[test]
    fn missing_orders_resolve_to_none() {
        let order = Order::new(
            OrderId::new(5).unwrap(),
            "10.00".parse().unwrap(),
            Timestamp::from_unix_secs(0).unwrap(),
        )
        .unwrap();
        let snapshot = RecordSnapshot::new(vec![], vec![order], vec![], vec![]);

        assert!(snapshot.order(OrderId::new(5).unwrap()).is_some());
        assert!(snapshot.order(OrderId::new(6).unwrap()).is_none());
        assert_eq!(snapshot.order_count(), 1);
    }
}
