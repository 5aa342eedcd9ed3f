//! Calendar month identifiers and their time windows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::foundation::{Timestamp, ValidationError};

/// A calendar month (`YYYY-MM`), independent of any day-of-month.
///
/// Internally normalized to the first day of the month, so ordering and
/// equality ignore whatever day the month was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportMonth(NaiveDate);

impl ReportMonth {
    /// Creates a month from year and month number (1-12).
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=9999).contains(&year) {
            return Err(ValidationError::out_of_range("year", 1, 9999, year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| ValidationError::out_of_range("month", 1, 12, month as i32))
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .and_then(|next| next.0.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following month, or `None` past the end of the calendar.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The month `count` months before this one.
    pub fn months_before(&self, count: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(count)).map(Self)
    }

    /// The inclusive time window of this month as observed in `tz`.
    pub fn window(&self, tz: Tz) -> MonthWindow {
        let start = local_midnight(tz, self.0);
        let next_start = self
            .next()
            .map(|next| local_midnight(tz, next.0))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        MonthWindow {
            month: *self,
            start: Timestamp::from_datetime(start),
            end: Timestamp::from_datetime(next_start - Duration::nanoseconds(1)),
        }
    }
}

impl fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for ReportMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::invalid_format("month", format!("expected YYYY-MM, got '{}'", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for ReportMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReportMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The instants covered by one calendar month: `[start, end]`, both inclusive.
///
/// `end` is the last representable instant before the next month begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub month: ReportMonth,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl MonthWindow {
    /// True if `ts` falls inside the window.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// True if the closed interval `[from, until]` intersects the window.
    pub fn overlaps(&self, from: Timestamp, until: Timestamp) -> bool {
        from <= self.end && until >= self.start
    }
}

/// Ordered months from `start`'s month through `end`'s month, inclusive.
///
/// Returns an empty list when `start` is after `end`.
pub fn month_range(start: NaiveDate, end: NaiveDate) -> Vec<ReportMonth> {
    if start > end {
        return Vec::new();
    }

    // Exclusive upper bound: first day of the month after `end`.
    let upper = ReportMonth::containing(end).next();
    let mut current = ReportMonth::containing(start);
    let mut months = Vec::new();

    loop {
        if upper.is_some_and(|upper| current >= upper) {
            break;
        }
        months.push(current);
        match current.next() {
            Some(next) => current = next,
            None => break,
        }
    }

    months
}

/// Local midnight at the start of `date` in `tz`, as a UTC instant.
///
/// When a DST transition skips midnight, the day starts at the first local
/// time that exists.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=3)
        .map(|hours| midnight + Duration::hours(hours))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> ReportMonth {
        ReportMonth::new(y, m).unwrap()
    }

    #[test]
    fn report_month_displays_as_year_dash_month() {
        assert_eq!(month(2025, 1).to_string(), "2025-01");
        assert_eq!(month(2024, 12).to_string(), "2024-12");
    }

    #[test]
    fn report_month_parses_and_rejects_garbage() {
        assert_eq!("2025-02".parse::<ReportMonth>().unwrap(), month(2025, 2));
        assert!("2025-13".parse::<ReportMonth>().is_err());
        assert!("2025-2".parse::<ReportMonth>().is_err());
        assert!("twenty".parse::<ReportMonth>().is_err());
    }

    #[test]
    fn report_month_ignores_day_of_month() {
        assert_eq!(ReportMonth::containing(date(2025, 3, 31)), month(2025, 3));
        assert_eq!(ReportMonth::containing(date(2025, 3, 1)), month(2025, 3));
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(month(2024, 2).last_day(), date(2024, 2, 29));
        assert_eq!(month(2025, 2).last_day(), date(2025, 2, 28));
        assert_eq!(month(2025, 12).last_day(), date(2025, 12, 31));
    }

    #[test]
    fn months_before_crosses_year_boundary() {
        assert_eq!(month(2025, 3).months_before(11), Some(month(2024, 4)));
    }

    #[test]
    fn range_across_year_boundary() {
        let months = month_range(date(2024, 11, 15), date(2025, 2, 10));
        assert_eq!(
            months,
            vec![month(2024, 11), month(2024, 12), month(2025, 1), month(2025, 2)]
        );
    }

    #[test]
    fn range_within_single_month_has_one_entry() {
        assert_eq!(month_range(date(2025, 1, 1), date(2025, 1, 31)), vec![month(2025, 1)]);
    }

    #[test]
    fn range_with_start_after_end_is_empty() {
        assert!(month_range(date(2025, 3, 1), date(2025, 2, 28)).is_empty());
    }

    #[test]
    fn utc_window_covers_whole_month() {
        let window = month(2025, 1).window(Tz::UTC);
        assert_eq!(window.start.as_datetime().to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(window.contains(Timestamp::from_unix_secs(1738367999).unwrap())); // 2025-01-31T23:59:59Z
        assert!(!window.contains(Timestamp::from_unix_secs(1738368000).unwrap())); // 2025-02-01T00:00:00Z
    }

    #[test]
    fn window_follows_configured_time_zone() {
        // January in New York starts at 05:00 UTC.
        let window = month(2025, 1).window(chrono_tz::America::New_York);
        assert_eq!(window.start.as_datetime().to_rfc3339(), "2025-01-01T05:00:00+00:00");
        assert!(window.contains(Timestamp::from_unix_secs(1738368000).unwrap())); // 2025-02-01T00:00:00Z
    }

    #[test]
    fn overlap_is_inclusive_on_both_edges() {
        let window = month(2025, 1).window(Tz::UTC);
        assert!(window.overlaps(window.end, window.end));
        assert!(window.overlaps(window.start, window.start));
        assert!(!window.overlaps(
            Timestamp::from_unix_secs(0).unwrap(),
            Timestamp::from_unix_secs(1).unwrap()
        ));
    }

    proptest! {
        #[test]
        fn same_month_range_has_exactly_one_month(y in 1990i32..2100, m in 1u32..=12, d1 in 1u32..=28, d2 in 1u32..=28) {
            let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            let months = month_range(date(y, m, lo), date(y, m, hi));
            prop_assert_eq!(months, vec![month(y, m)]);
        }

        #[test]
        fn range_is_ascending_without_gaps(y in 1990i32..2100, m in 1u32..=12, span in 0u32..60) {
            let start = month(y, m);
            let end = start.first_day().checked_add_months(Months::new(span)).unwrap();
            let months = month_range(start.first_day(), end);
            prop_assert_eq!(months.len() as u32, span + 1);
            for pair in months.windows(2) {
                prop_assert_eq!(pair[0].next(), Some(pair[1]));
            }
        }
    }
}
