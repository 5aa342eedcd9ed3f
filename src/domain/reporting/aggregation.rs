//! Monthly aggregation engine.
//!
//! Pure functions over a [`RecordSnapshot`]: every call scans the full
//! record set for one month window. Aggregates are commutative sums, so the
//! order of records in the snapshot never affects the result.
//!
//! Statuses are read as they are *now*. A subscription that was active in
//! March but has since been cancelled no longer counts as active for March.

use super::month::MonthWindow;
use super::records::{Membership, Subscription};
use super::snapshot::RecordSnapshot;
use super::stats::{MonthlyStats, StatsAccumulator};
use crate::domain::foundation::MembershipPlanId;
use crate::domain::reporting::SubscriptionStatus;

/// Computes subscription counts and totals for one month.
pub fn compute_monthly_stats(window: &MonthWindow, snapshot: &RecordSnapshot) -> MonthlyStats {
    let mut acc = StatsAccumulator::default();
    for subscription in snapshot.subscriptions() {
        tally_subscription(&mut acc, window, snapshot, subscription);
    }
    acc.finish()
}

fn tally_subscription(
    acc: &mut StatsAccumulator,
    window: &MonthWindow,
    snapshot: &RecordSnapshot,
    subscription: &Subscription,
) {
    // Open-ended subscriptions cover the whole queried month.
    let access_end = subscription.access_end().unwrap_or(window.end);
    if window.overlaps(subscription.starts_at, access_end) {
        match subscription.status {
            SubscriptionStatus::Active => acc.active += 1,
            SubscriptionStatus::PendingCancel => acc.pending_cancel += 1,
            _ => {}
        }
    }

    if window.contains(subscription.starts_at) {
        acc.new_subscriptions += 1;
        match subscription.parent_order_id.and_then(|id| snapshot.order(id)) {
            Some(order) => acc.signup_total += order.total,
            None => tracing::debug!(
                subscription_id = %subscription.id,
                "No signup order resolved; signup total unchanged"
            ),
        }
    }

    if subscription.cancelled_at.is_some_and(|ts| window.contains(ts)) {
        acc.cancellations += 1;
    }

    // Counted independently of cancellations: one subscription may add to both.
    if subscription.ends_at.is_some_and(|ts| window.contains(ts)) {
        acc.ended += 1;
    }

    for order_id in &subscription.renewal_order_ids {
        let Some(order) = snapshot.order(*order_id) else {
            tracing::debug!(
                subscription_id = %subscription.id,
                order_id = %order_id,
                "Skipping unresolved renewal order"
            );
            continue;
        };
        if window.contains(order.created_at) {
            acc.renewals += 1;
            acc.renewal_total += order.total;
        }
    }
}

/// Counts active club members of `plan_id` during the month.
///
/// Members whose customer currently holds an active, pending-cancel or
/// on-hold subscription are already counted as subscribers and are left out.
pub fn count_club_members(
    window: &MonthWindow,
    snapshot: &RecordSnapshot,
    plan_id: MembershipPlanId,
) -> u64 {
    snapshot
        .memberships()
        .iter()
        .filter(|membership| membership.plan_id == plan_id)
        .filter(|membership| is_club_member(window, snapshot, membership))
        .count() as u64
}

fn is_club_member(window: &MonthWindow, snapshot: &RecordSnapshot, membership: &Membership) -> bool {
    if !membership.status.is_active() {
        return false;
    }
    if membership.starts_at > window.end {
        return false;
    }
    if membership.ends_at.is_some_and(|end| end < window.start) {
        return false;
    }
    !snapshot.is_current_subscriber(membership.customer_id)
}
