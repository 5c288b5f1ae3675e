//! Metrics Poller
//!
//! Fetches a complete snapshot on a fixed period and republishes it to the
//! views through a `watch` channel. A failed fetch leaves the previous
//! snapshot in place (stale but available) and is only logged.
//!
//! Overlapping fetches (a manual refresh racing a scheduled one) are allowed.
//! Responses are applied in completion order; with `discard_stale_responses`
//! a response is dropped if a request issued after it has already been
//! applied.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::client::SnapshotSource;
use super::error::FailureKind;
use crate::model::MetricsSnapshot;

/// Shared, immutable snapshot as seen by subscribers
pub type SharedSnapshot = Option<Arc<MetricsSnapshot>>;

/// Shortest schedule period; `tokio::time::interval` rejects zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for poll behavior
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between scheduled fetches
    pub interval: Duration,
    /// Drop responses overtaken by a later-issued request
    pub discard_stale_responses: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            discard_stale_responses: true,
        }
    }
}

/// What happened to one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot replaced the current one
    Updated,
    /// A newer response was already applied; this one was dropped
    Stale,
    /// The fetch failed; the previous snapshot is kept
    Failed(FailureKind),
    /// The poller was stopped before the response arrived
    Ignored,
}

/// Counters for the poller's lifetime
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PollStats {
    pub successes: u64,
    pub failures: u64,
    pub stale_discarded: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Periodically fetches snapshots and publishes the latest one
pub struct MetricsPoller {
    source: Arc<dyn SnapshotSource>,
    config: PollerConfig,
    current: watch::Sender<SharedSnapshot>,
    in_flight: AtomicUsize,
    next_seq: AtomicU64,
    /// Sequence number of the applied snapshot; guards publication
    applied_seq: Mutex<u64>,
    stopped: AtomicBool,
    stats: Mutex<PollStats>,
}

impl MetricsPoller {
    /// Create a new poller; nothing is fetched until `start` or `refresh_now`
    ///
    /// An interval below [`MIN_POLL_INTERVAL`] is raised to it.
    pub fn new(source: Arc<dyn SnapshotSource>, mut config: PollerConfig) -> Self {
        config.interval = config.interval.max(MIN_POLL_INTERVAL);
        let (current, _rx) = watch::channel(None);
        Self {
            source,
            config,
            current,
            in_flight: AtomicUsize::new(0),
            next_seq: AtomicU64::new(1),
            applied_seq: Mutex::new(0),
            stopped: AtomicBool::new(false),
            stats: Mutex::new(PollStats::default()),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Latest snapshot, `None` until the first successful fetch
    pub fn current(&self) -> SharedSnapshot {
        self.current.borrow().clone()
    }

    /// Subscribe to snapshot replacements
    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        self.current.subscribe()
    }

    /// True while any fetch is in flight
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// True once the poller has been stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> PollStats {
        lock(&self.stats).clone()
    }

    /// Fetch a snapshot now, outside the schedule
    ///
    /// Never returns an error: failures are logged and reported through the
    /// returned outcome only.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlight::enter(&self.in_flight);

        let result = self.source.fetch().await;

        if self.is_stopped() {
            tracing::debug!(seq, "Poller stopped, ignoring response");
            return RefreshOutcome::Ignored;
        }

        match result {
            Ok(snapshot) => self.apply(seq, snapshot),
            Err(e) => {
                tracing::warn!(
                    seq,
                    source = %self.source.describe(),
                    kind = %e.kind(),
                    error = %e,
                    "Failed to fetch metrics"
                );
                let mut stats = lock(&self.stats);
                stats.failures += 1;
                stats.last_error = Some(e.to_string());
                RefreshOutcome::Failed(e.kind())
            }
        }
    }

    fn apply(&self, seq: u64, snapshot: MetricsSnapshot) -> RefreshOutcome {
        let mut applied = lock(&self.applied_seq);

        if self.config.discard_stale_responses && seq < *applied {
            tracing::debug!(seq, applied = *applied, "Discarding stale snapshot");
            lock(&self.stats).stale_discarded += 1;
            return RefreshOutcome::Stale;
        }

        *applied = seq;
        self.current.send_replace(Some(Arc::new(snapshot)));

        let mut stats = lock(&self.stats);
        stats.successes += 1;
        stats.last_success = Some(Utc::now());
        stats.last_error = None;

        RefreshOutcome::Updated
    }

    /// Start the scheduled fetch loop
    ///
    /// The first fetch happens immediately. Each tick spawns its own fetch,
    /// so a slow response does not delay the schedule.
    pub fn start(self: Arc<Self>) -> PollerHandle {
        tracing::info!(
            source = %self.source.describe(),
            interval_ms = self.config.interval.as_millis() as u64,
            "Starting metrics poller"
        );

        let poller = Arc::clone(&self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.config.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if poller.is_stopped() {
                    break;
                }

                let poller = Arc::clone(&poller);
                tokio::spawn(async move {
                    poller.refresh_now().await;
                });
            }
        });

        PollerHandle {
            poller: self,
            task: Some(task),
        }
    }

    /// Stop publishing; responses still in flight are ignored when they land
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            tracing::info!("Metrics poller stopped");
        }
    }
}

/// Owns the schedule of a started poller; stops it when dropped
pub struct PollerHandle {
    poller: Arc<MetricsPoller>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn poller(&self) -> &Arc<MetricsPoller> {
        &self.poller
    }

    /// Cancel the timer and stop the poller
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.poller.stop();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keeps the in-flight count accurate even if the fetch future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
