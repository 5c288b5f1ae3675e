//! Metrics polling
//!
//! All computation (RPS aggregation, uptime, error rates) happens behind an
//! external HTTP endpoint. This module only fetches and republishes it.
//!
//! ## Architecture
//!
//! - **Client**: `GET <endpoint>[?type=<name>]` → [`MetricsSnapshot`](crate::model::MetricsSnapshot)
//! - **Poller**: fixed-period fetch loop, manual refresh, latest-snapshot channel
//!
//! ## Data Flow
//!
//! 1. The poller ticks (or a refresh is requested)
//! 2. The client fetches and decodes a snapshot
//! 3. On success the snapshot replaces the current one; on failure the old one stays

mod client;
mod error;
mod poller;

pub use client::{MetricsClient, MetricsClientConfig, SnapshotSource};
pub use error::{FailureKind, FetchError, FetchResult};
pub use poller::{
    MetricsPoller, PollStats, PollerConfig, PollerHandle, RefreshOutcome, SharedSnapshot, MIN_POLL_INTERVAL,
};
