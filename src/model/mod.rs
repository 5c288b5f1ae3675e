//! Dashboard data model
//!
//! Values produced by the metrics endpoint and consumed by every view.
//! A [`MetricsSnapshot`] is immutable once received; each successful poll
//! replaces it wholesale.

pub mod types;

pub use types::{parse_leading_number, Aggregates, DataPoint, MetricsSnapshot, Series, SnapshotStatus};
