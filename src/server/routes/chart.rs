//! Chart Route
//!
//! - GET /api/v1/chart.svg - Current frame of the live chart

use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use crate::chart::{render_svg, ChartStyle};
use crate::server::state::AppState;

/// GET /api/v1/chart.svg
pub async fn chart_svg(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let style = ChartStyle::new(state.config.chart.color.clone(), "areaGradient");
    let svg = render_svg(&state.view.frame(), &style);

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    )
}
