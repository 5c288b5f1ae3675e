//! Live Series View
//!
//! Keeps the incoming series separate from the committed (rendered) one so a
//! new series is adopted only after a short delay. Renderers read
//! [`ChartFrame`]s and get a visually staggered transition instead of an
//! instant jump.
//!
//! ```text
//!   push(s) ──► pending = s ──(delay)──► committed = s ──► revision += 1
//!                   ▲                          │
//!                   └── push(s') aborts timer ─┘
//! ```
//!
//! Exactly one timer is alive at a time; every push cancels and replaces it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::path::{ChartPaths, PathBuilder, ValueScale};
use crate::model::Series;

/// Default buffering delay before a new series is committed
pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(50);

/// Three labels along an axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisLabels {
    pub start: String,
    pub middle: String,
    pub end: String,
}

impl AxisLabels {
    /// X-axis labels: first, middle-index (`len / 2`) and last point labels
    pub fn x_axis(series: &Series) -> Self {
        let label = |p: Option<&crate::model::DataPoint>| p.map(|p| p.label.clone()).unwrap_or_default();
        Self {
            start: label(series.first()),
            middle: label(series.middle()),
            end: label(series.last()),
        }
    }

    /// Y-axis labels, top to bottom: max, midpoint, min, rounded to integers
    pub fn y_axis(series: &Series) -> Self {
        match (series.min(), series.max()) {
            (Some(min), Some(max)) => Self {
                start: round_label(max),
                middle: round_label((max + min) / 2.0),
                end: round_label(min),
            },
            _ => Self::default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.start.is_empty() && self.middle.is_empty() && self.end.is_empty()
    }
}

/// Everything a renderer needs for one chart draw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFrame {
    /// Paths for the committed series
    pub paths: ChartPaths,
    /// Labels from the incoming series
    pub x_labels: AxisLabels,
    pub y_labels: AxisLabels,
    /// Points in the committed series
    pub point_count: usize,
    /// A newer series is waiting for its delay to elapse
    pub transitioning: bool,
}

#[derive(Default)]
struct ViewState {
    incoming: Series,
    pending: Option<Series>,
    committed: Series,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    revision: u64,
}

/// Two-slot (pending / committed) chart state with a single owned timer
pub struct LiveSeriesView {
    state: Arc<Mutex<ViewState>>,
    builder: PathBuilder,
    delay: Duration,
    revisions: Arc<watch::Sender<u64>>,
}

impl LiveSeriesView {
    /// Create an empty view
    pub fn new(builder: PathBuilder, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(ViewState::default())),
            builder,
            delay,
            revisions: Arc::new(tx),
        }
    }

    /// Buffering delay applied to each new arrival
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Receive the commit revision; it changes whenever the rendered series does
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Accept a new incoming series
    ///
    /// The first series (while nothing is committed) is adopted at once.
    /// Later series replace any pending one and are committed after the
    /// delay. Must be called from within a tokio runtime.
    pub fn push(&self, series: Series) {
        let mut state = lock(&self.state);

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.incoming = series.clone();

        if state.committed.is_empty() || self.delay.is_zero() {
            state.pending = None;
            commit(&mut state, series, &self.revisions);
            return;
        }

        state.pending = Some(series);

        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let revisions = Arc::clone(&self.revisions);
        let delay = self.delay;

        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut state = lock(&shared);
            // A newer push may have raced this timer past its abort
            if state.generation != generation {
                return;
            }
            state.timer = None;
            if let Some(series) = state.pending.take() {
                commit(&mut state, series, &revisions);
            }
        }));
    }

    /// The series currently rendered
    pub fn committed(&self) -> Series {
        lock(&self.state).committed.clone()
    }

    /// The most recently pushed series
    pub fn incoming(&self) -> Series {
        lock(&self.state).incoming.clone()
    }

    /// True while a pushed series waits for its delay
    pub fn is_transitioning(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Build the frame to draw now
    ///
    /// Paths come from the committed series drawn under the incoming
    /// series' value range, so the line and marker always agree with the
    /// y-axis labels. Axis labels come from the incoming series. An empty
    /// series yields empty paths and blank labels.
    pub fn frame(&self) -> ChartFrame {
        let state = lock(&self.state);
        let paths = match ValueScale::of(&state.incoming) {
            Some(scale) => self.builder.build_with_scale(&state.committed, &scale),
            None => self.builder.build(&state.committed),
        };
        ChartFrame {
            paths,
            x_labels: AxisLabels::x_axis(&state.incoming),
            y_labels: AxisLabels::y_axis(&state.incoming),
            point_count: state.committed.len(),
            transitioning: state.pending.is_some(),
        }
    }

    pub fn builder(&self) -> &PathBuilder {
        &self.builder
    }

    /// Cancel the pending timer; the committed series stays as it is
    pub fn close(&self) {
        let mut state = lock(&self.state);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.pending = None;
    }
}

impl Drop for LiveSeriesView {
    fn drop(&mut self) {
        self.close();
    }
}

fn round_label(value: f64) -> String {
    // Adding 0.0 turns -0 into 0
    format!("{}", value.round() + 0.0)
}

fn commit(state: &mut ViewState, series: Series, revisions: &watch::Sender<u64>) {
    state.committed = series;
    state.revision += 1;
    revisions.send_replace(state.revision);
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
