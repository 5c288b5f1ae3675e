//! Event transport
//!
//! Two ways out: an awaited JSON `POST` whose response body can be handed
//! back to the caller, and a fire-and-forget beacon that is attempted even
//! while the context is shutting down.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinSet;

use super::error::{ReportError, ReportResult};

/// Delivery primitives used by the reporter
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body; returns the decoded response body when there is one
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> ReportResult<Option<serde_json::Value>>;

    /// Queue a best-effort send; returns false when it could not even be queued
    fn send_beacon(&self, url: &str, body: String) -> bool;
}

/// reqwest-backed transport
///
/// Beacons run as detached tasks; [`HttpTransport::flush`] gives them a
/// bounded window to finish before the process exits.
pub struct HttpTransport {
    client: Client,
    beacons: Mutex<JoinSet<()>>,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> ReportResult<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            beacons: Mutex::new(JoinSet::new()),
        })
    }

    /// Number of beacons not yet finished
    pub fn pending_beacons(&self) -> usize {
        self.beacons.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Wait up to `timeout` for queued beacons; returns how many were abandoned
    pub async fn flush(&self, timeout: Duration) -> usize {
        let mut beacons = std::mem::take(&mut *self.beacons.lock().unwrap_or_else(|p| p.into_inner()));
        if beacons.is_empty() {
            return 0;
        }

        let drained = tokio::time::timeout(timeout, async {
            while beacons.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::debug!(abandoned = beacons.len(), "Beacon flush timed out");
        }
        beacons.len()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> ReportResult<Option<serde_json::Value>> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReportError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ReportError::Parse(e.to_string()))
    }

    fn send_beacon(&self, url: &str, body: String) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!("No runtime available for beacon");
            return false;
        }

        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        let mut beacons = self.beacons.lock().unwrap_or_else(|p| p.into_inner());
        // Reap finished beacons so the set does not grow without bound
        while beacons.try_join_next().is_some() {}

        beacons.spawn(async move {
            if let Err(e) = request.send().await {
                tracing::debug!(error = %e, "Beacon delivery failed");
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_json_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/track")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(r#"{"page":"/"}"#.to_string()))
            .with_status(200)
            .with_body(r#"{"status":"tracked"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let body = serde_json::json!({"page": "/", "session_id": "s"});
        let response = transport
            .post_json(&format!("{}/track", server.url()), &body)
            .await
            .unwrap();

        assert_eq!(response, Some(serde_json::json!({"status": "tracked"})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_json_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/track").with_status(204).create_async().await;

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let response = transport
            .post_json(&format!("{}/track", server.url()), &serde_json::json!({}))
            .await
            .unwrap();

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_post_json_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/track")
            .with_status(400)
            .with_body(r#"{"error":"bad"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let err = transport
            .post_json(&format!("{}/track", server.url()), &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_beacon_is_delivered_on_flush() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/track")
            .match_body(mockito::Matcher::PartialJsonString(r#"{"event":"page_exit"}"#.to_string()))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let queued = transport.send_beacon(
            &format!("{}/track", server.url()),
            r#"{"event":"page_exit","session_id":"s"}"#.to_string(),
        );
        assert!(queued);

        let abandoned = transport.flush(Duration::from_secs(2)).await;
        assert_eq!(abandoned, 0);
        assert_eq!(transport.pending_beacons(), 0);
        mock.assert_async().await;
    }

    #[test]
    fn test_beacon_without_runtime_is_not_queued() {
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        assert!(!transport.send_beacon("http://127.0.0.1:9/track", "{}".to_string()));
    }
}
