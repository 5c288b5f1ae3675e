//! Page-view reporter
//!
//! Reports a page view on mount and on every navigation, and a page exit on
//! unload. Reporting is best-effort: failures are logged at debug level and
//! never reach the caller, and nothing is retried or queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use super::environment::Environment;
use super::events::{PageExitEvent, PageViewEvent};
use super::session::SessionIdentifier;
use super::transport::Transport;

/// Receives the endpoint's response to a page view
pub type PageViewCallback = Arc<dyn Fn(serde_json::Value) + Send + Sync>;

pub struct PageViewReporter {
    endpoint: String,
    environment: Arc<dyn Environment>,
    transport: Arc<dyn Transport>,
    session: SessionIdentifier,
    on_page_view: Option<PageViewCallback>,
}

impl PageViewReporter {
    pub fn new(
        endpoint: impl Into<String>,
        environment: Arc<dyn Environment>,
        transport: Arc<dyn Transport>,
        session: SessionIdentifier,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            environment,
            transport,
            session,
            on_page_view: None,
        }
    }

    /// Forward successful page-view responses to `callback`
    pub fn with_callback(mut self, callback: PageViewCallback) -> Self {
        self.on_page_view = Some(callback);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Session id for this context, created on first use
    pub fn session_id(&self) -> String {
        self.session.get_or_create()
    }

    /// POST a page view; returns the response body if there was one
    pub async fn send_page_view(&self, session_id: &str) -> Option<serde_json::Value> {
        let event = PageViewEvent::capture(self.environment.as_ref(), session_id);
        let body = match event.encode() {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(kind = %e.kind(), error = %e, "Failed to encode page view");
                return None;
            }
        };

        match self.transport.post_json(&self.endpoint, &body).await {
            Ok(response) => {
                tracing::debug!(page = %event.page, "Page view reported");
                response
            }
            Err(e) => {
                tracing::debug!(kind = %e.kind(), error = %e, page = %event.page, "Page view not reported");
                None
            }
        }
    }

    /// Send a page view and hand any response to the callback
    pub async fn track_page_view(&self) {
        let session_id = self.session_id();
        if let Some(response) = self.send_page_view(&session_id).await {
            self.notify(response);
        }
    }

    /// Queue the exit beacon; false when the transport could not queue it
    pub fn send_page_exit(&self, session_id: &str) -> bool {
        let event = PageExitEvent::capture(self.environment.as_ref(), session_id);
        let body = match event.encode() {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(kind = %e.kind(), error = %e, "Failed to encode page exit");
                return false;
            }
        };

        let queued = self.transport.send_beacon(&self.endpoint, body);
        if !queued {
            tracing::debug!(page = %event.page, "Page exit beacon not queued");
        }
        queued
    }

    fn notify(&self, response: serde_json::Value) {
        if let Some(callback) = &self.on_page_view {
            callback(response);
        }
    }

    /// Attach to a navigation stream
    ///
    /// Reports the initial view immediately and one view per change on
    /// `navigation`. [`MountedReporter::unload`] sends the exit beacon;
    /// dropping or unmounting detaches without one.
    pub fn mount<T>(self: Arc<Self>, mut navigation: watch::Receiver<T>) -> MountedReporter
    where
        T: Send + Sync + 'static,
    {
        let session_id = self.session_id();
        let live = Arc::new(AtomicBool::new(true));
        let (unload_tx, mut unload_rx) = oneshot::channel::<()>();

        let reporter = self;
        let task_live = live.clone();
        let task_session = session_id.clone();

        let task = tokio::spawn(async move {
            navigation.borrow_and_update();
            reporter.spawn_view(&task_session, &task_live);

            let mut listening = true;
            loop {
                tokio::select! {
                    changed = navigation.changed(), if listening => match changed {
                        Ok(()) => {
                            navigation.borrow_and_update();
                            reporter.spawn_view(&task_session, &task_live);
                        }
                        // Navigation source is gone; unload can still happen
                        Err(_) => listening = false,
                    },
                    unload = &mut unload_rx => {
                        if unload.is_ok() {
                            reporter.send_page_exit(&task_session);
                        }
                        break;
                    }
                }
            }
            task_live.store(false, Ordering::SeqCst);
        });

        tracing::debug!(session_id = %session_id, "Page view reporter mounted");

        MountedReporter {
            task: Some(task),
            unload: Some(unload_tx),
            live,
            session_id,
        }
    }

    fn spawn_view(self: &Arc<Self>, session_id: &str, live: &Arc<AtomicBool>) {
        let reporter = self.clone();
        let session_id = session_id.to_string();
        let live = live.clone();
        tokio::spawn(async move {
            if let Some(response) = reporter.send_page_view(&session_id).await {
                // Resolution after unmount is ignored
                if live.load(Ordering::SeqCst) {
                    reporter.notify(response);
                }
            }
        });
    }
}

/// A reporter attached to a context
pub struct MountedReporter {
    task: Option<JoinHandle<()>>,
    unload: Option<oneshot::Sender<()>>,
    live: Arc<AtomicBool>,
    session_id: String,
}

impl MountedReporter {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// The context is going away: send the exit beacon and detach
    pub async fn unload(mut self) {
        if let Some(unload) = self.unload.take() {
            let _ = unload.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.live.store(false, Ordering::SeqCst);
    }

    /// Detach without reporting an exit
    pub fn unmount(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.unload.take();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MountedReporter {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::environment::FixedEnvironment;
    use crate::analytics::error::{ReportError, ReportResult};
    use crate::analytics::session::MemorySessionStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeTransport {
        posts: Mutex<Vec<serde_json::Value>>,
        beacons: Mutex<Vec<serde_json::Value>>,
        response: Option<serde_json::Value>,
        fail: bool,
    }

    impl FakeTransport {
        fn posts(&self) -> Vec<serde_json::Value> {
            self.posts.lock().unwrap().clone()
        }

        fn beacons(&self) -> Vec<serde_json::Value> {
            self.beacons.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn post_json(&self, _url: &str, body: &serde_json::Value) -> ReportResult<Option<serde_json::Value>> {
            self.posts.lock().unwrap().push(body.clone());
            if self.fail {
                return Err(ReportError::Status {
                    status: 503,
                    message: "down".to_string(),
                });
            }
            Ok(self.response.clone())
        }

        fn send_beacon(&self, _url: &str, body: String) -> bool {
            self.beacons
                .lock()
                .unwrap()
                .push(serde_json::from_str(&body).unwrap());
            true
        }
    }

    fn reporter(env: Arc<FixedEnvironment>, transport: Arc<FakeTransport>) -> PageViewReporter {
        PageViewReporter::new(
            "http://analytics.test/track",
            env,
            transport,
            SessionIdentifier::new(Arc::new(MemorySessionStore::new())),
        )
    }

    async fn wait_until(cond: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !cond() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[tokio::test]
    async fn test_unload_sends_exit_beacon_once() {
        let env = Arc::new(FixedEnvironment::new("/"));
        let transport = Arc::new(FakeTransport::default());
        let reporter = Arc::new(reporter(env, transport.clone()));

        let (_nav_tx, nav_rx) = watch::channel("/".to_string());
        let mounted = reporter.mount(nav_rx);
        wait_until(|| transport.posts().len() == 1).await;

        mounted.unload().await;

        let posts = transport.posts();
        let beacons = transport.beacons();
        assert_eq!(beacons.len(), 1);
        assert_eq!(beacons[0]["event"], "page_exit");
        assert_eq!(beacons[0]["session_id"], posts[0]["session_id"]);
        assert!(beacons[0]["session_time"].is_u64());
    }

    #[tokio::test]
    async fn test_navigation_reports_each_page() {
        let env = Arc::new(FixedEnvironment::new("/dashboard"));
        let transport = Arc::new(FakeTransport::default());
        let reporter = Arc::new(reporter(env.clone(), transport.clone()));

        let (nav_tx, nav_rx) = watch::channel("/dashboard".to_string());
        let mounted = reporter.mount(nav_rx);
        wait_until(|| transport.posts().len() == 1).await;

        env.set_page("/charts");
        nav_tx.send("/charts".to_string()).unwrap();
        wait_until(|| transport.posts().len() == 2).await;

        let posts = transport.posts();
        assert_eq!(posts[0]["page"], "/dashboard");
        assert_eq!(posts[1]["page"], "/charts");
        assert_eq!(posts[0]["session_id"], posts[1]["session_id"]);
        assert_eq!(posts[0]["session_id"], mounted.session_id());

        mounted.unmount();
        assert!(transport.beacons().is_empty());
    }

    #[tokio::test]
    async fn test_response_forwarded_to_callback() {
        let env = Arc::new(FixedEnvironment::new("/"));
        let transport = Arc::new(FakeTransport {
            response: Some(serde_json::json!({"status": "tracked"})),
            ..Default::default()
        });
        let received = Arc::new(Mutex::new(Vec::<serde_json::Value>::new()));
        let sink = received.clone();
        let reporter = Arc::new(
            reporter(env, transport).with_callback(Arc::new(move |v: serde_json::Value| sink.lock().unwrap().push(v))),
        );

        let (_nav_tx, nav_rx) = watch::channel(());
        let _mounted = reporter.mount(nav_rx);
        wait_until(|| received.lock().unwrap().len() == 1).await;

        assert_eq!(received.lock().unwrap()[0]["status"], "tracked");
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let env = Arc::new(FixedEnvironment::new("/"));
        let transport = Arc::new(FakeTransport {
            fail: true,
            ..Default::default()
        });
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let reporter = reporter(env, transport.clone())
            .with_callback(Arc::new(move |_: serde_json::Value| flag.store(true, Ordering::SeqCst)));

        let session_id = reporter.session_id();
        assert!(reporter.send_page_view(&session_id).await.is_none());
        reporter.track_page_view().await;

        assert_eq!(transport.posts().len(), 2);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_closed_navigation_still_unloads() {
        let env = Arc::new(FixedEnvironment::new("/"));
        let transport = Arc::new(FakeTransport::default());
        let reporter = Arc::new(reporter(env, transport.clone()));

        let (nav_tx, nav_rx) = watch::channel(0u32);
        let mounted = reporter.mount(nav_rx);
        drop(nav_tx);
        wait_until(|| transport.posts().len() == 1).await;

        assert!(mounted.is_live());
        mounted.unload().await;
        assert_eq!(transport.beacons().len(), 1);
    }
}
