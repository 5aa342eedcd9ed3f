//! SnapshotLoader - batch-fetches every record one report needs.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::domain::foundation::{DomainError, MembershipPlanId};
use crate::domain::reporting::RecordSnapshot;
use crate::ports::RecordSource;

/// Loads a [`RecordSnapshot`] from the record source.
///
/// Every subscription, every order they reference and every active
/// membership of the plan is fetched once, however many months the report
/// spans. Records that disappear between listing and fetching are skipped.
pub struct SnapshotLoader {
    source: Arc<dyn RecordSource>,
}

impl SnapshotLoader {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self, plan_id: MembershipPlanId) -> Result<RecordSnapshot, DomainError> {
        let ids = self.source.list_subscription_ids(None).await?;
        let mut subscriptions = Vec::with_capacity(ids.len());
        for id in ids {
            match self.source.get_subscription(id).await? {
                Some(subscription) => subscriptions.push(subscription),
                None => tracing::debug!(subscription_id = %id, "Subscription vanished; skipping"),
            }
        }

        let order_ids: BTreeSet<_> = subscriptions
            .iter()
            .flat_map(|sub| sub.parent_order_id.into_iter().chain(sub.renewal_order_ids.iter().copied()))
            .collect();
        let mut orders = Vec::with_capacity(order_ids.len());
        for id in order_ids {
            match self.source.get_order(id).await? {
                Some(order) => orders.push(order),
                None => tracing::debug!(order_id = %id, "Order not found; skipping"),
            }
        }

        let mut memberships = self.source.list_active_memberships_for_plan(plan_id).await?;
        for membership in &mut memberships {
            if let Some(end) = self.source.get_membership_end_date(membership.id).await? {
                membership.ends_at = Some(end);
            }
        }

        let customers: BTreeSet<_> = memberships.iter().map(|m| m.customer_id).collect();
        let mut current_subscribers = HashSet::new();
        for customer_id in customers {
            if self
                .source
                .find_active_or_pending_subscription_for_customer(customer_id)
                .await?
                .is_some()
            {
                current_subscribers.insert(customer_id);
            }
        }

        tracing::debug!(
            subscriptions = subscriptions.len(),
            orders = orders.len(),
            memberships = memberships.len(),
            "Record snapshot loaded"
        );

        Ok(RecordSnapshot::new(subscriptions, orders, memberships, current_subscribers))
    }
}
