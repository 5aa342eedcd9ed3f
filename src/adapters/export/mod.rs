//! Report export adapters.

mod tabular;

pub use tabular::{TabularReportExporter, FULL_HEADERS, LEGACY_HEADERS};
