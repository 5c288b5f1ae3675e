//! Dashboard Shell
//!
//! Composes navigation state, the latest snapshot and the live chart into
//! the panel set of the selected section. Everything here is read-only with
//! respect to the data; renderers turn a [`SectionView`] into HTML or text.

use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::cards::{headline_cards, health_cards, stats_cards, MetricCard};
use super::nav::{Navigation, Section};
use crate::chart::{ChartFrame, ChartStyle, LiveSeriesView, DEFAULT_COLOR};
use crate::metrics::{MetricsPoller, SharedSnapshot};
use crate::model::MetricsSnapshot;

/// Height and color of the history chart in the charts section
const HISTORY_CHART_HEIGHT: u32 = 400;
const HISTORY_CHART_COLOR: &str = "#10B981";

/// Size and color of the dashboard's main chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub height: u32,
    pub color: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            height: 300,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// One chart panel, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub title: String,
    pub height: u32,
    pub style: ChartStyle,
    pub frame: ChartFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Cards(Vec<MetricCard>),
    Chart(ChartPanel),
    Placeholder { title: String, message: String },
}

/// Everything visible for the selected section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub section: Section,
    pub heading: String,
    pub panels: Vec<Panel>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShellStatus {
    pub section: Section,
    pub expanded: bool,
    pub refreshing: bool,
    pub has_snapshot: bool,
}

pub fn heading(section: Section) -> &'static str {
    match section {
        Section::Dashboard => "Real Analytics Dashboard",
        Section::Charts => "Detailed charts",
        Section::Stats => "Detailed statistics",
        Section::Alerts => "Alerts",
        Section::History => "History",
        Section::Settings => "Settings",
    }
}

/// Panel set for `section`
///
/// Without a snapshot the data panels are replaced by a single
/// placeholder; the page itself always renders.
pub fn compose(
    section: Section,
    snapshot: Option<&MetricsSnapshot>,
    frame: &ChartFrame,
    layout: &ChartLayout,
) -> SectionView {
    let mut view = SectionView {
        section,
        heading: heading(section).to_string(),
        panels: Vec::new(),
        status: snapshot.map(|s| s.status.to_string()),
    };

    if section.is_placeholder() {
        view.panels.push(Panel::Placeholder {
            title: heading(section).to_string(),
            message: "Coming soon".to_string(),
        });
        return view;
    }

    let Some(snapshot) = snapshot else {
        view.panels.push(Panel::Placeholder {
            title: "No data yet".to_string(),
            message: "Waiting for the first metrics snapshot".to_string(),
        });
        return view;
    };

    let aggregates = snapshot.aggregates.as_ref();
    match section {
        Section::Dashboard => {
            if let Some(aggregates) = aggregates {
                view.panels.push(Panel::Cards(headline_cards(aggregates)));
            }
            view.panels.push(Panel::Chart(ChartPanel {
                title: "Requests per second (RPS)".to_string(),
                height: layout.height,
                style: ChartStyle::new(layout.color.clone(), "rpsGradient"),
                frame: frame.clone(),
            }));
            if let Some(aggregates) = aggregates {
                view.panels.push(Panel::Cards(health_cards(aggregates)));
            }
        }
        Section::Charts => {
            view.panels.push(Panel::Chart(ChartPanel {
                title: "RPS over the last 30 minutes".to_string(),
                height: HISTORY_CHART_HEIGHT,
                style: ChartStyle::new(HISTORY_CHART_COLOR, "historyGradient"),
                frame: frame.clone(),
            }));
        }
        Section::Stats => {
            if let Some(aggregates) = aggregates {
                view.panels.push(Panel::Cards(stats_cards(aggregates)));
            }
        }
        _ => {}
    }

    view
}

/// Push every new snapshot's series into the chart view
///
/// Ends when the poller is dropped.
pub fn spawn_series_feed(poller: &MetricsPoller, view: Arc<LiveSeriesView>) -> JoinHandle<()> {
    let mut snapshots = poller.subscribe();
    tokio::spawn(async move {
        let initial = snapshots.borrow_and_update().clone();
        if let Some(snapshot) = initial {
            view.push(snapshot.series.clone());
        }
        while snapshots.changed().await.is_ok() {
            let latest = snapshots.borrow_and_update().clone();
            if let Some(snapshot) = latest {
                view.push(snapshot.series.clone());
            }
        }
    })
}

/// Navigation plus live data, for a single interactive client
pub struct DashboardShell {
    navigation: Navigation,
    poller: Arc<MetricsPoller>,
    view: Arc<LiveSeriesView>,
    layout: ChartLayout,
}

impl DashboardShell {
    pub fn new(poller: Arc<MetricsPoller>, view: Arc<LiveSeriesView>) -> Self {
        Self {
            navigation: Navigation::new(),
            poller,
            view,
            layout: ChartLayout::default(),
        }
    }

    /// Builder method: set the main chart layout
    pub fn layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn active(&self) -> Section {
        self.navigation.active()
    }

    /// Select a section; returns true when it changed
    pub fn navigate(&mut self, section: Section) -> bool {
        self.navigation.select(section)
    }

    pub fn toggle_navigation(&mut self) -> bool {
        self.navigation.toggle()
    }

    pub fn snapshot(&self) -> SharedSnapshot {
        self.poller.current()
    }

    pub fn poller(&self) -> &Arc<MetricsPoller> {
        &self.poller
    }

    pub fn status(&self) -> ShellStatus {
        ShellStatus {
            section: self.navigation.active(),
            expanded: self.navigation.is_expanded(),
            refreshing: self.poller.is_refreshing(),
            has_snapshot: self.poller.current().is_some(),
        }
    }

    /// What the active section shows right now
    pub fn render(&self) -> SectionView {
        let snapshot = self.poller.current();
        compose(
            self.navigation.active(),
            snapshot.as_deref(),
            &self.view.frame(),
            &self.layout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Interpolation, PathBuilder};
    use crate::metrics::{FetchResult, PollerConfig, SnapshotSource};
    use crate::model::{Aggregates, DataPoint, Series};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedSource(MetricsSnapshot);

    #[async_trait]
    impl SnapshotSource for FixedSource {
        async fn fetch(&self) -> FetchResult<MetricsSnapshot> {
            Ok(self.0.clone())
        }
    }

    fn aggregates() -> Aggregates {
        Aggregates {
            current_rps: 5.0,
            avg_rps: 8.0,
            peak_rps: 15.0,
            total_requests: 4200,
            uptime: "99.9%".to_string(),
            response_time: "85ms".to_string(),
            active_users: 3,
            error_rate: "0.5%".to_string(),
        }
    }

    fn abc_snapshot() -> MetricsSnapshot {
        let series: Series = vec![
            DataPoint::labelled(5.0, "a"),
            DataPoint::labelled(15.0, "b"),
            DataPoint::labelled(5.0, "c"),
        ]
        .into();
        MetricsSnapshot::new(series, Some(aggregates()))
    }

    fn chart_panels(view: &SectionView) -> Vec<&ChartPanel> {
        view.panels
            .iter()
            .filter_map(|p| match p {
                Panel::Chart(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_snapshot_renders_chart_end_to_end() {
        let poller = Arc::new(MetricsPoller::new(
            Arc::new(FixedSource(abc_snapshot())),
            PollerConfig::default(),
        ));
        let view = Arc::new(LiveSeriesView::new(
            PathBuilder::new(Interpolation::Linear),
            Duration::from_millis(50),
        ));
        let shell = DashboardShell::new(poller.clone(), view.clone());

        poller.refresh_now().await;
        let snapshot = shell.snapshot().unwrap();
        view.push(snapshot.series.clone());

        let rendered = shell.render();
        let charts = chart_panels(&rendered);
        assert_eq!(charts.len(), 1);

        let frame = &charts[0].frame;
        assert_eq!(frame.point_count, 3);
        assert_eq!(frame.paths.vertices.len(), 3);
        assert!(frame.paths.area.ends_with("L 100 100 L 0 100 Z"));
        assert_eq!(frame.x_labels.start, "a");
        assert_eq!(frame.x_labels.middle, "b");
        assert_eq!(frame.x_labels.end, "c");
        assert_eq!(charts[0].height, 300);
    }

    #[tokio::test]
    async fn test_series_feed_pushes_into_view() {
        let poller = Arc::new(MetricsPoller::new(
            Arc::new(FixedSource(abc_snapshot())),
            PollerConfig::default(),
        ));
        let view = Arc::new(LiveSeriesView::new(
            PathBuilder::new(Interpolation::Smooth),
            Duration::from_millis(50),
        ));
        let mut revisions = view.subscribe();

        let feed = spawn_series_feed(&poller, view.clone());
        poller.refresh_now().await;

        tokio::time::timeout(Duration::from_secs(5), revisions.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.committed().len(), 3);
        feed.abort();
    }

    #[test]
    fn test_no_snapshot_renders_placeholder() {
        for section in [Section::Dashboard, Section::Charts, Section::Stats] {
            let view = compose(section, None, &ChartFrame::default(), &ChartLayout::default());
            assert_eq!(view.panels.len(), 1);
            assert!(matches!(view.panels[0], Panel::Placeholder { .. }));
            assert!(view.status.is_none());
        }
    }

    #[test]
    fn test_panel_sets_per_section() {
        let snapshot = abc_snapshot();
        let frame = ChartFrame::default();
        let layout = ChartLayout::default();

        let dashboard = compose(Section::Dashboard, Some(&snapshot), &frame, &layout);
        assert_eq!(dashboard.panels.len(), 3);
        assert!(matches!(&dashboard.panels[0], Panel::Cards(cards) if cards.len() == 4));
        assert!(matches!(&dashboard.panels[2], Panel::Cards(cards) if cards.len() == 3));
        assert_eq!(dashboard.status.as_deref(), Some("healthy"));

        let charts = compose(Section::Charts, Some(&snapshot), &frame, &layout);
        let chart = chart_panels(&charts)[0];
        assert_eq!(chart.height, 400);
        assert_eq!(chart.style.color, "#10B981");

        let stats = compose(Section::Stats, Some(&snapshot), &frame, &layout);
        assert!(matches!(&stats.panels[0], Panel::Cards(cards) if cards[0].value == "4,200"));

        let alerts = compose(Section::Alerts, Some(&snapshot), &frame, &layout);
        assert!(matches!(&alerts.panels[0], Panel::Placeholder { message, .. } if message == "Coming soon"));
    }

    #[test]
    fn test_missing_aggregates_keep_chart() {
        let snapshot = MetricsSnapshot::new(abc_snapshot().series, None);
        let view = compose(
            Section::Dashboard,
            Some(&snapshot),
            &ChartFrame::default(),
            &ChartLayout::default(),
        );
        assert_eq!(view.panels.len(), 1);
        assert!(matches!(view.panels[0], Panel::Chart(_)));
    }

    #[tokio::test]
    async fn test_shell_navigation() {
        let poller = Arc::new(MetricsPoller::new(
            Arc::new(FixedSource(abc_snapshot())),
            PollerConfig::default(),
        ));
        let view = Arc::new(LiveSeriesView::new(
            PathBuilder::new(Interpolation::Smooth),
            Duration::ZERO,
        ));
        let mut shell = DashboardShell::new(poller, view);

        assert!(shell.navigate(Section::Stats));
        assert_eq!(shell.render().heading, "Detailed statistics");
        assert!(!shell.toggle_navigation());
        assert!(!shell.status().expanded);
        assert!(!shell.status().has_snapshot);
    }
}
