//! Metric cards
//!
//! Display values derived from a snapshot's aggregates. Numbers are shown
//! the way the endpoint sends them; only totals get thousands separators.

use serde::Serialize;

use crate::model::Aggregates;

/// Error rate above this percentage marks the card as a warning
pub const ERROR_RATE_WARNING_THRESHOLD: f64 = 2.0;

/// Direction indicator next to a card value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Stable => "–",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Healthy,
    Warning,
    Error,
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::Healthy => write!(f, "Healthy"),
            CardStatus::Warning => write!(f, "Warning"),
            CardStatus::Error => write!(f, "Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub icon: String,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_value: Option<String>,
    pub status: CardStatus,
}

impl MetricCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            icon: icon.into(),
            trend: Trend::Stable,
            trend_value: None,
            status: CardStatus::Healthy,
        }
    }

    /// Builder method: set trend and its text
    pub fn trend(mut self, trend: Trend, value: Option<String>) -> Self {
        self.trend = trend;
        self.trend_value = value;
        self
    }

    /// Builder method: set status
    pub fn status(mut self, status: CardStatus) -> Self {
        self.status = status;
        self
    }
}

/// Plain number formatting: integers without a fractional part
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// `1234567` → `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Current against average, as a trend and a signed percentage
pub fn rps_trend(current: f64, average: f64) -> (Trend, Option<String>) {
    if average <= 0.0 || !current.is_finite() || !average.is_finite() {
        return (Trend::Stable, None);
    }
    let change = (current - average) / average * 100.0;
    let rounded = change.round();
    if rounded == 0.0 {
        (Trend::Stable, Some("0%".to_string()))
    } else if rounded > 0.0 {
        (Trend::Up, Some(format!("+{}%", rounded as i64)))
    } else {
        (Trend::Down, Some(format!("{}%", rounded as i64)))
    }
}

pub fn error_rate_status(aggregates: &Aggregates) -> CardStatus {
    match aggregates.error_rate_percent() {
        Some(rate) if rate > ERROR_RATE_WARNING_THRESHOLD => CardStatus::Warning,
        _ => CardStatus::Healthy,
    }
}

/// Top row of the dashboard section
pub fn headline_cards(aggregates: &Aggregates) -> Vec<MetricCard> {
    let (trend, trend_value) = rps_trend(aggregates.current_rps, aggregates.avg_rps);
    vec![
        MetricCard::new("Current RPS", format_number(aggregates.current_rps), "zap").trend(trend, trend_value),
        MetricCard::new("Average RPS", format_number(aggregates.avg_rps), "bar-chart"),
        MetricCard::new("Active users", aggregates.active_users.to_string(), "users"),
        MetricCard::new("Response time", aggregates.response_time.clone(), "clock"),
    ]
}

/// Row below the dashboard chart
pub fn health_cards(aggregates: &Aggregates) -> Vec<MetricCard> {
    vec![
        MetricCard::new("Peak RPS", format_number(aggregates.peak_rps), "trending-up"),
        MetricCard::new("Error rate", aggregates.error_rate.clone(), "alert-triangle")
            .status(error_rate_status(aggregates)),
        MetricCard::new("Uptime", aggregates.uptime.clone(), "shield"),
    ]
}

/// Cards of the statistics section
pub fn stats_cards(aggregates: &Aggregates) -> Vec<MetricCard> {
    vec![
        MetricCard::new("Total requests", format_thousands(aggregates.total_requests), "database"),
        MetricCard::new("Average RPS", format_number(aggregates.avg_rps), "bar-chart"),
        MetricCard::new("Peak RPS", format_number(aggregates.peak_rps), "trending-up"),
    ]
}
