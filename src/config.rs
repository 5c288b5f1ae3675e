//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `DSTAT_*` environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chart::{Interpolation, PathBuilder, DEFAULT_COLOR};
use crate::dashboard::ChartLayout;
use crate::metrics::{MetricsClientConfig, PollerConfig, MIN_POLL_INTERVAL};
use crate::server::ServerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metrics endpoint and polling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,

    /// Sent as `?type=`; empty disables the parameter
    #[serde(default = "default_metric_type")]
    pub metric_type: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_true")]
    pub discard_stale_responses: bool,
}

fn default_metrics_endpoint() -> String {
    "http://localhost:8080/metrics".to_string()
}

fn default_metric_type() -> String {
    "rps".to_string()
}

fn default_poll_interval() -> u64 {
    1000 // 1 second
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_metrics_endpoint(),
            metric_type: default_metric_type(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: default_request_timeout(),
            discard_stale_responses: default_true(),
        }
    }
}

impl MetricsConfig {
    pub fn client_config(&self) -> MetricsClientConfig {
        let metric_type = self.metric_type.trim();
        MetricsClientConfig {
            endpoint: self.endpoint.clone(),
            metric_type: (!metric_type.is_empty()).then(|| metric_type.to_string()),
            request_timeout_ms: self.request_timeout_ms,
        }
    }

    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL),
            discard_stale_responses: self.discard_stale_responses,
        }
    }
}

/// Page-view analytics endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_analytics_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// How long to wait for the exit beacon on shutdown
    #[serde(default = "default_flush_timeout")]
    pub flush_timeout_ms: u64,
}

fn default_analytics_endpoint() -> String {
    "http://localhost:8080/analytics".to_string()
}

fn default_flush_timeout() -> u64 {
    1000
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analytics_endpoint(),
            enabled: default_true(),
            request_timeout_ms: default_request_timeout(),
            flush_timeout_ms: default_flush_timeout(),
        }
    }
}

/// Live chart rendering
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default = "default_transition_delay")]
    pub transition_delay_ms: u64,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    #[serde(default = "default_chart_color")]
    pub color: String,

    #[serde(default)]
    pub interpolation: Interpolation,
}

fn default_transition_delay() -> u64 {
    50
}

fn default_chart_height() -> u32 {
    300
}

fn default_chart_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay(),
            height: default_chart_height(),
            color: default_chart_color(),
            interpolation: Interpolation::default(),
        }
    }
}

impl ChartConfig {
    pub fn path_builder(&self) -> PathBuilder {
        PathBuilder::new(self.interpolation)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn layout(&self) -> ChartLayout {
        ChartLayout {
            height: self.height,
            color: self.color.clone(),
        }
    }
}

/// HTTP server for `dstat-server`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("dstat").join("config.toml")),
            Some(PathBuf::from("/etc/dstat/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Server settings for the HTTP layer
    ///
    /// Pages refresh at the poll interval, rounded up to whole seconds.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            page_refresh_secs: self.metrics.poll_interval_ms.div_ceil(1000).max(1),
            chart: self.chart.layout(),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Metrics overrides
        if let Some(endpoint) = lookup("DSTAT_METRICS_ENDPOINT") {
            self.metrics.endpoint = endpoint;
        }
        if let Some(metric_type) = lookup("DSTAT_METRICS_TYPE") {
            self.metrics.metric_type = metric_type;
        }
        if let Some(interval) = lookup("DSTAT_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.metrics.poll_interval_ms = ms;
            }
        }

        // Analytics overrides
        if let Some(endpoint) = lookup("DSTAT_ANALYTICS_ENDPOINT") {
            self.analytics.endpoint = endpoint;
        }
        if let Some(enabled) = lookup("DSTAT_ANALYTICS_ENABLED") {
            if let Some(flag) = parse_flag(&enabled) {
                self.analytics.enabled = flag;
            }
        }

        // Server overrides
        if let Some(host) = lookup("DSTAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DSTAT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("DSTAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DSTAT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# dstat Configuration
#
# Environment variables override these settings:
# - DSTAT_METRICS_ENDPOINT
# - DSTAT_METRICS_TYPE
# - DSTAT_POLL_INTERVAL_MS
# - DSTAT_ANALYTICS_ENDPOINT
# - DSTAT_ANALYTICS_ENABLED
# - DSTAT_HOST
# - DSTAT_PORT
# - DSTAT_LOG_LEVEL
# - DSTAT_LOG_FORMAT

[metrics]
# Endpoint returning a complete metrics snapshot
endpoint = "http://localhost:8080/metrics"

# Sent as ?type=<name>; leave empty to omit
metric_type = "rps"

# How often to poll (ms)
poll_interval_ms = 1000

# Request timeout (ms)
request_timeout_ms = 5000

# Drop responses overtaken by a later request
discard_stale_responses = true

[analytics]
# Endpoint receiving page views and page exits
endpoint = "http://localhost:8080/analytics"

# Report page views at all
enabled = true

# Request timeout (ms)
request_timeout_ms = 5000

# How long to wait for the exit beacon on shutdown (ms)
flush_timeout_ms = 1000

[chart]
# Delay before a new series replaces the drawn one (ms)
transition_delay_ms = 50

# Main chart height (px)
height = 300

# Line and fill color
color = "#3B82F6"

# smooth or linear
interpolation = "smooth"

[server]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8090

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.metrics.poll_interval_ms, 1000);
        assert!(config.metrics.discard_stale_responses);
        assert_eq!(config.chart.transition_delay_ms, 50);
        assert_eq!(config.chart.interpolation, Interpolation::Smooth);
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.server_config().page_refresh_secs, 1);
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.metrics.endpoint, defaults.metrics.endpoint);
        assert_eq!(config.analytics.flush_timeout_ms, defaults.analytics.flush_timeout_ms);
        assert_eq!(config.chart.color, defaults.chart.color);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[metrics]\nendpoint = \"http://metrics.test/api\"\nmetric_type = \"\"\npoll_interval_ms = 2500\n\n[chart]\ninterpolation = \"linear\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.metrics.endpoint, "http://metrics.test/api");
        assert_eq!(config.metrics.client_config().metric_type, None);
        assert_eq!(config.metrics.poller_config().interval, Duration::from_millis(2500));
        assert_eq!(config.chart.path_builder().interpolation(), Interpolation::Linear);
        assert_eq!(config.chart.height, 300);
        assert_eq!(config.server_config().page_refresh_secs, 3);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[metrics\nendpoint = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DSTAT_METRICS_ENDPOINT", "http://env.test/m"),
            ("DSTAT_POLL_INTERVAL_MS", "500"),
            ("DSTAT_ANALYTICS_ENABLED", "false"),
            ("DSTAT_PORT", "not-a-port"),
            ("DSTAT_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.metrics.endpoint, "http://env.test/m");
        assert_eq!(config.metrics.poll_interval_ms, 500);
        assert!(!config.analytics.enabled);
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let metrics = MetricsConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(metrics.poller_config().interval, Duration::from_millis(1));
    }
}
