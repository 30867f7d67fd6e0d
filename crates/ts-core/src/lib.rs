//! Core report logic for the timesheet tool.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: mapping interval tags to categories (Guild, Standup,
//!   Induction, Phabricator task references)
//! - Aggregation: walking a date range day by day, merging intervals per
//!   category and tag group, summing day and grand totals
//! - Row assembly: projecting the aggregated data into table rows

pub mod category;
pub mod day;
pub mod entry;
pub mod fetch;
pub mod interval;
pub mod report;

pub use category::{Category, TaskRef, Tracker};
pub use entry::CategoryEntry;
pub use fetch::{FetchError, TaskFetcher, TaskMetadata};
pub use interval::TrackedInterval;
pub use report::{ReportOptions, Row, RowKind, build_report, format_hours};
