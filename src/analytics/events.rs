//! Analytics event records
//!
//! JSON shapes posted to the analytics endpoint. Durations travel as
//! integer milliseconds under `load_time` / `session_time`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::error::{ReportError, ReportResult};

/// Event name carried by exit records
pub const PAGE_EXIT_EVENT: &str = "page_exit";

/// Sent on initial load and on every client-side navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageViewEvent {
    pub page: String,
    pub referrer: String,
    /// Milliseconds from context start to this view
    #[serde(rename = "load_time")]
    pub load_time_ms: u64,
    pub session_id: String,
    /// ISO-8601 UTC timestamp with milliseconds
    pub timestamp: String,
    pub screen_resolution: String,
    pub user_agent: String,
}

impl PageViewEvent {
    /// Capture a page view from the environment
    pub fn capture(env: &dyn Environment, session_id: &str) -> Self {
        Self {
            page: env.page_path(),
            referrer: env.referrer(),
            load_time_ms: env.elapsed_ms(),
            session_id: session_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            screen_resolution: env.screen_resolution(),
            user_agent: env.user_agent(),
        }
    }

    /// JSON body for the POST request
    pub fn encode(&self) -> ReportResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}

/// Sent once when the context is torn down
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageExitEvent {
    pub page: String,
    /// Always [`PAGE_EXIT_EVENT`]
    pub event: String,
    pub session_id: String,
    /// Milliseconds the context was alive
    #[serde(rename = "session_time")]
    pub session_time_ms: u64,
}

impl PageExitEvent {
    pub fn capture(env: &dyn Environment, session_id: &str) -> Self {
        Self {
            page: env.page_path(),
            event: PAGE_EXIT_EVENT.to_string(),
            session_id: session_id.to_string(),
            session_time_ms: env.elapsed_ms(),
        }
    }

    /// JSON text for the beacon
    pub fn encode(&self) -> ReportResult<String> {
        serde_json::to_string(self).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::environment::FixedEnvironment;

    #[test]
    fn test_page_view_wire_names() {
        let env = FixedEnvironment::new("/charts")
            .with_screen(800, 600)
            .with_user_agent("ua");
        let event = PageViewEvent::capture(&env, "session_1_abc");
        let json = event.encode().unwrap();

        assert_eq!(json["page"], "/charts");
        assert_eq!(json["session_id"], "session_1_abc");
        assert_eq!(json["screen_resolution"], "800x600");
        assert_eq!(json["user_agent"], "ua");
        assert!(json.get("load_time").unwrap().is_u64());
        assert!(json.get("load_time_ms").is_none());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_page_exit_wire_names() {
        let env = FixedEnvironment::new("/stats");
        let event = PageExitEvent::capture(&env, "s");
        let text = event.encode().unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["event"], "page_exit");
        assert_eq!(json["page"], "/stats");
        assert!(json.get("session_time").unwrap().is_u64());
    }
}
