//! Metrics endpoint client
//!
//! HTTP client for the external service that computes RPS, uptime and error
//! rates. One `GET` returns a complete [`MetricsSnapshot`].

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use crate::model::MetricsSnapshot;

/// Anything that can produce a fresh snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch one complete snapshot
    async fn fetch(&self) -> FetchResult<MetricsSnapshot>;

    /// Human-readable description for logs
    fn describe(&self) -> String {
        "metrics source".to_string()
    }
}

/// Configuration for the metrics client
#[derive(Debug, Clone)]
pub struct MetricsClientConfig {
    /// Endpoint URL
    pub endpoint: String,
    /// Optional `?type=` query value
    pub metric_type: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for MetricsClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/metrics".to_string(),
            metric_type: None,
            request_timeout_ms: 5000,
        }
    }
}

/// REST client for the metrics endpoint
pub struct MetricsClient {
    client: Client,
    config: MetricsClientConfig,
}

impl MetricsClient {
    /// Create a new client with the given configuration
    pub fn new(config: MetricsClientConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &MetricsClientConfig {
        &self.config
    }

    /// Full request URL including the optional type query
    pub fn url(&self) -> String {
        match self.config.metric_type.as_deref() {
            Some(metric_type) if !metric_type.is_empty() => {
                let separator = if self.config.endpoint.contains('?') { '&' } else { '?' };
                format!(
                    "{}{}type={}",
                    self.config.endpoint,
                    separator,
                    urlencoding::encode(metric_type)
                )
            }
            _ => self.config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl SnapshotSource for MetricsClient {
    async fn fetch(&self) -> FetchResult<MetricsSnapshot> {
        let response = self
            .client
            .get(self.url())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        let snapshot: MetricsSnapshot = serde_json::from_str(&body)?;

        if let Some(index) = snapshot.series.first_non_finite() {
            return Err(FetchError::InvalidSeries(format!(
                "non-finite value at index {}",
                index
            )));
        }

        Ok(snapshot)
    }

    fn describe(&self) -> String {
        self.url()
    }
}
