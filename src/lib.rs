//! Subscription Snapshot - monthly subscription and club membership reports.
//!
//! Builds one row per calendar month with active, pending-cancel and new
//! subscription counts, renewal and cancellation activity, revenue totals
//! and active club members. Reports are served over HTTP as JSON, HTML and
//! CSV, and mailed to a configured recipient on the first of every month.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
