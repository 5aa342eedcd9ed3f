//! Runtime settings shared by the reporting handlers.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::domain::foundation::{MembershipPlanId, Timestamp};
use crate::domain::reporting::DateRange;

/// Number of months in the default report range.
pub const DEFAULT_RANGE_MONTHS: u32 = 12;

/// Report parameters resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    /// Zone in which month boundaries and "today" are evaluated.
    pub timezone: Tz,
    /// Plan whose members are counted as club members.
    pub membership_plan_id: MembershipPlanId,
    /// Longest range a single report may span.
    pub max_range_months: u32,
}

impl ReportSettings {
    pub fn new(timezone: Tz, membership_plan_id: MembershipPlanId, max_range_months: u32) -> Self {
        Self {
            timezone,
            membership_plan_id,
            max_range_months,
        }
    }

    /// Calendar date of `now` in the report zone.
    pub fn today(&self, now: Timestamp) -> NaiveDate {
        now.local_date(self.timezone)
    }

    /// The trailing twelve months ending with the month containing `now`.
    pub fn default_range(&self, now: Timestamp) -> DateRange {
        DateRange::trailing_months(self.today(now), DEFAULT_RANGE_MONTHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn default_range_is_evaluated_in_report_zone() {
        // 2025-01-31 23:30 UTC is already February 1st in Berlin.
        let now = Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 1, 31, 23, 30, 0).unwrap());
        let plan = MembershipPlanId::new(13981).unwrap();

        let utc = ReportSettings::new(Tz::UTC, plan, 120).default_range(now);
        assert_eq!(utc.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(utc.end, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());

        let berlin = ReportSettings::new(chrono_tz::Europe::Berlin, plan, 120).default_range(now);
        assert_eq!(berlin.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(berlin.end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
