//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Poller status and counters

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::server::dto::HealthResponse;
use crate::server::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// `degraded` while no snapshot is available or the last fetch failed;
/// the dashboard keeps serving either way.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let poll = state.poller.stats();
    let has_snapshot = state.poller.current().is_some();

    let status = if state.poller.is_stopped() {
        "stopped"
    } else if has_snapshot && poll.last_error.is_none() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        has_snapshot,
        refreshing: state.poller.is_refreshing(),
        poll,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
