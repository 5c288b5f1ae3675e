//! # dstat
//!
//! Live request-rate monitoring dashboard: polls an external metrics
//! endpoint, draws the series as an SVG line chart and reports page views
//! to an analytics endpoint.
//!
//! ## Features
//!
//! - **Polling**: fixed-period snapshot fetch with manual refresh and a stale-response guard
//! - **Charts**: linear or smoothed SVG paths with a buffered, delayed transition
//! - **Analytics**: per-session page views and a best-effort exit beacon
//! - **Front ends**: server-rendered HTML pages and a terminal dashboard
//!
//! ## Modules
//!
//! - [`model`]: Snapshot and series types
//! - [`chart`]: Path generation, live view and SVG rendering
//! - [`metrics`]: Endpoint client and poller
//! - [`analytics`]: Session id, environment, transport and reporter
//! - [`dashboard`]: Navigation, cards and panel composition
//! - [`server`]: HTTP server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dstat::chart::{LiveSeriesView, PathBuilder, Interpolation, DEFAULT_TRANSITION_DELAY};
//! use dstat::metrics::{MetricsClient, MetricsClientConfig, MetricsPoller, PollerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetricsClient::new(MetricsClientConfig::default())?;
//!     let poller = Arc::new(MetricsPoller::new(Arc::new(client), PollerConfig::default()));
//!     let view = Arc::new(LiveSeriesView::new(
//!         PathBuilder::new(Interpolation::Smooth),
//!         DEFAULT_TRANSITION_DELAY,
//!     ));
//!
//!     let _feed = dstat::dashboard::spawn_series_feed(&poller, Arc::clone(&view));
//!     let handle = Arc::clone(&poller).start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     println!("{:?}", view.frame().x_labels);
//!
//!     handle.stop();
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod server;

// Re-export top-level types for convenience
pub use model::{Aggregates, DataPoint, MetricsSnapshot, Series, SnapshotStatus};

pub use chart::{ChartFrame, ChartPaths, Interpolation, LiveSeriesView, PathBuilder};

pub use metrics::{FetchError, MetricsClient, MetricsPoller, PollerConfig, PollerHandle, SnapshotSource};

pub use analytics::{
    Environment, HttpTransport, MountedReporter, PageViewReporter, SessionIdentifier, Transport,
};

pub use dashboard::{DashboardShell, Navigation, Section};

pub use server::{build_router, serve, ApiError, AppState, ServerConfig};

pub use config::{Config, ConfigError, LoggingConfig};
