//! Response bodies

use serde::Serialize;

use crate::metrics::{PollStats, RefreshOutcome};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy, degraded (stale or no data) or stopped
    pub status: String,
    pub has_snapshot: bool,
    pub refreshing: bool,
    pub poll: PollStats,
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// updated, stale, failed or ignored
    pub outcome: String,
    /// Failure class when the fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Other fetches still running
    pub refreshing: bool,
}

impl RefreshResponse {
    pub fn new(outcome: RefreshOutcome, refreshing: bool) -> Self {
        let (outcome, failure) = match outcome {
            RefreshOutcome::Updated => ("updated", None),
            RefreshOutcome::Stale => ("stale", None),
            RefreshOutcome::Failed(kind) => ("failed", Some(kind.to_string())),
            RefreshOutcome::Ignored => ("ignored", None),
        };
        Self {
            outcome: outcome.to_string(),
            failure,
            refreshing,
        }
    }
}
