//! Validated report date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::month::{month_range, ReportMonth};
use crate::domain::foundation::ValidationError;

/// Inclusive pair of calendar dates a report covers.
///
/// The end date may be any day inside the final month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting ranges that span more than `max_months`.
    ///
    /// A start after the end is accepted and yields no months.
    pub fn new(start: NaiveDate, end: NaiveDate, max_months: u32) -> Result<Self, ValidationError> {
        let range = Self { start, end };
        let months = range.months().len();
        if months > max_months as usize {
            return Err(ValidationError::out_of_range(
                "date_range",
                0,
                max_months as i32,
                months.min(i32::MAX as usize) as i32,
            ));
        }
        Ok(range)
    }

    /// The trailing `months`-month window ending with `today`'s month.
    ///
    /// Starts on the first day of the month `months - 1` months before
    /// `today` and ends on the last day of `today`'s month.
    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let current = ReportMonth::containing(today);
        let first = current
            .months_before(months.saturating_sub(1))
            .unwrap_or(current);
        Self {
            start: first.first_day(),
            end: current.last_day(),
        }
    }

    /// Builds a range from optional `YYYY-MM-DD` strings.
    ///
    /// Each missing or blank bound falls back to the matching bound of
    /// `default`. Malformed input is rejected rather than guessed at.
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        default: DateRange,
        max_months: u32,
    ) -> Result<Self, ValidationError> {
        let start = parse_bound("start_date", start)?.unwrap_or(default.start);
        let end = parse_bound("end_date", end)?.unwrap_or(default.end);
        Self::new(start, end, max_months)
    }

    /// Months covered by this range, ascending.
    pub fn months(&self) -> Vec<ReportMonth> {
        month_range(self.start, self.end)
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ValidationError::invalid_format(field, e.to_string())),
    }
}
