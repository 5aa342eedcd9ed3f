//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `reporting` - Month ranges, source records and the monthly aggregation engine

pub mod foundation;
pub mod reporting;
