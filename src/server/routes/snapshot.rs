//! Snapshot Routes
//!
//! - GET /api/v1/snapshot - Latest snapshot, 204 before the first one
//! - POST /api/v1/refresh - Fetch now, outside the schedule

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::server::dto::RefreshResponse;
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

/// GET /api/v1/snapshot
pub async fn latest(State(state): State<Arc<AppState>>) -> Response {
    match state.poller.current() {
        Some(snapshot) => Json(snapshot.as_ref().clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// POST /api/v1/refresh
///
/// Waits for the fetch; a failed fetch is still a 200 since the previous
/// snapshot stays available.
pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult<Json<RefreshResponse>> {
    if state.poller.is_stopped() {
        return Err(ApiError::ServiceUnavailable("Metrics poller is stopped".to_string()));
    }

    let outcome = state.poller.refresh_now().await;
    tracing::info!(?outcome, "Manual refresh");

    Ok(Json(RefreshResponse::new(outcome, state.poller.is_refreshing())))
}
