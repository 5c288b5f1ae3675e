//! Application State
//!
//! Shared state for all handlers. The poller and the chart view are owned
//! by the binary; handlers only read them (and trigger refreshes).

use std::sync::Arc;
use std::time::Instant;

use crate::chart::LiveSeriesView;
use crate::dashboard::ChartLayout;
use crate::metrics::MetricsPoller;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Source of the latest snapshot
    pub poller: Arc<MetricsPoller>,
    /// Chart state fed from the poller
    pub view: Arc<LiveSeriesView>,
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(poller: Arc<MetricsPoller>, view: Arc<LiveSeriesView>, config: ServerConfig) -> Self {
        Self {
            poller,
            view,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Auto-refresh period of rendered pages in seconds
    pub page_refresh_secs: u64,
    /// Main chart layout
    pub chart: ChartLayout,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            page_refresh_secs: 1,
            chart: ChartLayout::default(),
        }
    }
}

impl ServerConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
