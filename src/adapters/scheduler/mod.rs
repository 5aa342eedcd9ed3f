//! Background services driven by the clock.

mod monthly;

pub use monthly::{next_run_after, MonthlyReportScheduler};
