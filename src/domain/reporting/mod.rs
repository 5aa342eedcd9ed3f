//! Monthly subscription and membership reporting.
//!
//! - `month` / `date_range` - calendar months, month windows and validated ranges
//! - `records` - subscriptions, orders and memberships read from the record store
//! - `snapshot` - the batch-fetched record set for one report invocation
//! - `aggregation` - pure per-month counting over a snapshot
//! - `stats` / `report` - computed rows and money rendering

mod aggregation;
mod date_range;
mod email_address;
mod errors;
mod month;
mod records;
mod report;
mod snapshot;
mod stats;

pub use aggregation::{compute_monthly_stats, count_club_members};
pub use date_range::DateRange;
pub use email_address::EmailAddress;
pub use errors::ReportError;
pub use month::{month_range, MonthWindow, ReportMonth};
pub use records::{Membership, MembershipStatus, Order, Subscription, SubscriptionStatus};
pub use report::{ReportRow, SubscriptionReport};
pub use snapshot::RecordSnapshot;
pub use stats::{format_money, MonthlyStats};
