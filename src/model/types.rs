//! Core data types for the DSTAT dashboard
//!
//! This module defines the values that flow from the metrics endpoint to the views:
//! - `DataPoint`: A single labelled measurement
//! - `Series`: An ordered run of data points (the chart's x-axis sequence)
//! - `Aggregates`: Scalar metrics shown on the cards
//! - `MetricsSnapshot`: One complete replacement value for everything displayed

use serde::{Deserialize, Serialize};

/// A single measurement in a series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// ISO-8601 timestamp as sent by the endpoint
    pub timestamp: String,
    /// The measured value
    pub value: f64,
    /// Short display label (e.g. "14:05")
    #[serde(default)]
    pub label: String,
}

impl DataPoint {
    /// Create a new data point
    pub fn new(timestamp: impl Into<String>, value: f64, label: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            label: label.into(),
        }
    }

    /// Create a data point with only a value and label (timestamp left empty)
    pub fn labelled(value: f64, label: impl Into<String>) -> Self {
        Self::new(String::new(), value, label)
    }
}

/// An ordered sequence of data points
///
/// Order is caller-supplied and defines the x-axis; timestamps and labels
/// need not be unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Series(Vec<DataPoint>);

impl Series {
    /// Create an empty series
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the series has no points
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the points in order
    pub fn points(&self) -> &[DataPoint] {
        &self.0
    }

    /// Iterate over the values in order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|p| p.value)
    }

    /// Smallest value, `None` when empty
    pub fn min(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    /// Largest value, `None` when empty
    pub fn max(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }

    /// Point at the middle index (`len / 2`)
    pub fn middle(&self) -> Option<&DataPoint> {
        self.0.get(self.0.len() / 2)
    }

    /// First point
    pub fn first(&self) -> Option<&DataPoint> {
        self.0.first()
    }

    /// Last point
    pub fn last(&self) -> Option<&DataPoint> {
        self.0.last()
    }

    /// Index of the first non-finite value, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|p| !p.value.is_finite())
    }
}

impl From<Vec<DataPoint>> for Series {
    fn from(points: Vec<DataPoint>) -> Self {
        Self(points)
    }
}

impl FromIterator<DataPoint> for Series {
    fn from_iter<I: IntoIterator<Item = DataPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregate metrics computed by the remote service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aggregates {
    pub current_rps: f64,
    pub avg_rps: f64,
    pub peak_rps: f64,
    pub total_requests: u64,
    /// Display string, e.g. "99.8%"
    pub uptime: String,
    /// Display string, e.g. "120ms"
    pub response_time: String,
    pub active_users: u64,
    /// Display string, e.g. "1.4%"
    pub error_rate: String,
}

impl Aggregates {
    /// Error rate as a number, parsed from its display string ("1.4%" → 1.4)
    pub fn error_rate_percent(&self) -> Option<f64> {
        parse_leading_number(&self.error_rate)
    }
}

/// Overall health reported alongside a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    #[default]
    Healthy,
    Warning,
    Error,
    /// Any status string this client does not know
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotStatus::Healthy => write!(f, "healthy"),
            SnapshotStatus::Warning => write!(f, "warning"),
            SnapshotStatus::Error => write!(f, "error"),
            SnapshotStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One complete value for everything the dashboard displays
///
/// Replaces the previous snapshot wholesale on every successful poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    /// Metric type this snapshot describes ("rps" by default)
    #[serde(rename = "type", default = "default_metric_type")]
    pub metric_type: String,
    /// The charted series
    #[serde(rename = "data", default)]
    pub series: Series,
    /// Card values; absent for metric types without aggregates
    #[serde(rename = "metrics", default, skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<Aggregates>,
    /// When the service produced the snapshot
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: SnapshotStatus,
}

fn default_metric_type() -> String {
    "rps".to_string()
}

impl MetricsSnapshot {
    /// Create a snapshot from a series and optional aggregates
    pub fn new(series: Series, aggregates: Option<Aggregates>) -> Self {
        Self {
            metric_type: default_metric_type(),
            series,
            aggregates,
            timestamp: None,
            status: SnapshotStatus::Healthy,
        }
    }

    /// Builder method: set status
    pub fn status(mut self, status: SnapshotStatus) -> Self {
        self.status = status;
        self
    }
}

/// Parse the numeric prefix of a display string such as "1.4%" or "120ms"
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "rps",
        "data": [
            {"timestamp": "2024-05-01T12:00:00", "value": 120, "label": "12:00"},
            {"timestamp": "2024-05-01T12:01:00", "value": 95.5, "label": "12:01"}
        ],
        "metrics": {
            "current_rps": 95.5,
            "avg_rps": 107,
            "peak_rps": 120,
            "total_requests": 12930,
            "uptime": "99.8%",
            "response_time": "140ms",
            "active_users": 410,
            "error_rate": "2.3%"
        },
        "timestamp": "2024-05-01T12:01:00",
        "status": "healthy"
    }"#;

    #[test]
    fn test_snapshot_decodes_wire_format() {
        let snapshot: MetricsSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.metric_type, "rps");
        assert_eq!(snapshot.series.len(), 2);
        assert_eq!(snapshot.series.points()[1].label, "12:01");
        assert_eq!(snapshot.status, SnapshotStatus::Healthy);

        let aggregates = snapshot.aggregates.unwrap();
        assert_eq!(aggregates.total_requests, 12930);
        assert_eq!(aggregates.error_rate_percent(), Some(2.3));
    }

    #[test]
    fn test_snapshot_without_aggregates() {
        let json = r#"{"type": "errors", "data": [], "timestamp": "2024-05-01T12:00:00", "status": "healthy"}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.metric_type, "errors");
        assert!(snapshot.series.is_empty());
        assert!(snapshot.aggregates.is_none());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let json = r#"{"data": [], "status": "degraded"}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.status, SnapshotStatus::Unknown);
    }

    #[test]
    fn test_series_bounds_and_middle() {
        let series: Series = vec![
            DataPoint::labelled(5.0, "a"),
            DataPoint::labelled(15.0, "b"),
            DataPoint::labelled(5.0, "c"),
            DataPoint::labelled(1.0, "d"),
        ]
        .into();

        assert_eq!(series.min(), Some(1.0));
        assert_eq!(series.max(), Some(15.0));
        assert_eq!(series.middle().unwrap().label, "c");
        assert!(Series::new().min().is_none());
        assert!(Series::new().middle().is_none());
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("1.4%"), Some(1.4));
        assert_eq!(parse_leading_number("120ms"), Some(120.0));
        assert_eq!(parse_leading_number(" 99.8% "), Some(99.8));
        assert_eq!(parse_leading_number("n/a"), None);
    }
}
