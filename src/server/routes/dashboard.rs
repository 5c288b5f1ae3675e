//! Dashboard Pages
//!
//! - GET / - Dashboard section
//! - GET /section/:id - Any section; unknown ids fall back to the dashboard

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::dashboard::{compose, render_page, PageOptions, Section};
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// "collapsed" hides the sidebar labels
    pub nav: Option<String>,
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Html<String> {
    Html(render(&state, Section::Dashboard, &query))
}

/// GET /section/:id
pub async fn section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    Html(render(&state, Section::from_id(&id), &query))
}

fn render(state: &AppState, section: Section, query: &PageQuery) -> String {
    let snapshot = state.poller.current();
    let view = compose(
        section,
        snapshot.as_deref(),
        &state.view.frame(),
        &state.config.chart,
    );

    let options = PageOptions {
        expanded: query.nav.as_deref() != Some("collapsed"),
        refresh_secs: Some(state.config.page_refresh_secs),
    };
    render_page(&view, options)
}
