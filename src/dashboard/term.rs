//! Terminal rendering
//!
//! Plain-text rendering of a [`SectionView`] for the `dstat` binary. The
//! chart becomes a sparkline of the committed vertices.

use std::fmt::Write;

use super::cards::MetricCard;
use super::nav::{Navigation, NAV_ITEMS};
use super::shell::{ChartPanel, Panel, SectionView};
use crate::chart::ChartFrame;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Widest sparkline drawn; older vertices are cut from the left
pub const MAX_SPARKLINE_WIDTH: usize = 72;

/// Render the whole screen
pub fn render_screen(view: &SectionView, navigation: &Navigation, refreshing: bool) -> String {
    let mut out = String::new();

    let _ = write!(out, "DSTAT · {}", view.heading);
    if let Some(status) = &view.status {
        let _ = write!(out, "  [{}]", status);
    }
    if refreshing {
        out.push_str("  refreshing…");
    }
    out.push('\n');

    out.push_str(&render_nav(navigation));
    out.push('\n');

    for panel in &view.panels {
        out.push('\n');
        match panel {
            Panel::Cards(cards) => {
                for card in cards {
                    out.push_str(&render_card(card));
                    out.push('\n');
                }
            }
            Panel::Chart(chart) => out.push_str(&render_chart(chart)),
            Panel::Placeholder { title, message } => {
                let _ = writeln!(out, "  {}: {}", title, message);
            }
        }
    }

    out.push_str("\n[1-6] section  [r] refresh  [t] toggle menu  [q] quit\n");
    out
}

/// Sidebar as one line; collapsed shows numbers only
pub fn render_nav(navigation: &Navigation) -> String {
    NAV_ITEMS
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let text = if navigation.is_expanded() {
                format!("{} {}", i + 1, section.label())
            } else {
                (i + 1).to_string()
            };
            if *section == navigation.active() {
                format!("[{}]", text)
            } else {
                format!(" {} ", text)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_card(card: &MetricCard) -> String {
    let mut line = format!("  {:<16} {:>12}", card.title, card.value);
    if let Some(trend_value) = &card.trend_value {
        let _ = write!(line, " {} {}", card.trend.symbol(), trend_value);
    }
    let _ = write!(line, "  ({})", card.status);
    line
}

fn render_chart(chart: &ChartPanel) -> String {
    let frame = &chart.frame;
    let mut out = String::new();
    let _ = writeln!(out, "  {}", chart.title);

    if frame.paths.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let spark = sparkline(frame);
    let _ = writeln!(
        out,
        "  {:>6} ┤ {}",
        frame.y_labels.start,
        spark
    );
    let _ = writeln!(
        out,
        "  {:>6} ┤ {} … {} … {}",
        frame.y_labels.end, frame.x_labels.start, frame.x_labels.middle, frame.x_labels.end
    );
    out
}

/// One block character per vertex, taller for higher values
pub fn sparkline(frame: &ChartFrame) -> String {
    let vertices = &frame.paths.vertices;
    let skip = vertices.len().saturating_sub(MAX_SPARKLINE_WIDTH);

    vertices
        .iter()
        .skip(skip)
        .map(|v| {
            // y runs from 100 (minimum) up to 20 (maximum)
            let level = ((100.0 - v.y) / 80.0 * 7.0).round().clamp(0.0, 7.0) as usize;
            SPARK_LEVELS[level]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AxisLabels, ChartStyle, Interpolation, PathBuilder};
    use crate::dashboard::nav::Section;
    use crate::model::{DataPoint, Series};

    fn frame(values: &[f64]) -> ChartFrame {
        let series: Series = values
            .iter()
            .enumerate()
            .map(|(i, v)| DataPoint::labelled(*v, format!("t{}", i)))
            .collect();
        ChartFrame {
            paths: PathBuilder::new(Interpolation::Smooth).build(&series),
            x_labels: AxisLabels::x_axis(&series),
            y_labels: AxisLabels::y_axis(&series),
            point_count: series.len(),
            transitioning: false,
        }
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&frame(&[5.0, 15.0, 5.0])), "▁█▁");
        assert_eq!(sparkline(&frame(&[])), "");
    }

    #[test]
    fn test_sparkline_is_capped() {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        assert_eq!(sparkline(&frame(&values)).chars().count(), MAX_SPARKLINE_WIDTH);
    }

    #[test]
    fn test_nav_marks_active() {
        let mut nav = Navigation::new();
        nav.select(Section::Charts);
        let line = render_nav(&nav);
        assert!(line.contains("[2 Charts]"));

        nav.toggle();
        assert!(render_nav(&nav).contains("[2]"));
    }

    #[test]
    fn test_screen_contains_panels() {
        let view = SectionView {
            section: Section::Dashboard,
            heading: "Real Analytics Dashboard".to_string(),
            panels: vec![
                Panel::Cards(vec![MetricCard::new("Current RPS", "5", "zap")]),
                Panel::Chart(ChartPanel {
                    title: "Requests per second (RPS)".to_string(),
                    height: 300,
                    style: ChartStyle::default(),
                    frame: frame(&[1.0, 2.0, 3.0]),
                }),
            ],
            status: Some("healthy".to_string()),
        };

        let screen = render_screen(&view, &Navigation::new(), true);
        assert!(screen.contains("[healthy]"));
        assert!(screen.contains("refreshing"));
        assert!(screen.contains("Current RPS"));
        assert!(screen.contains("t0 … t1 … t2"));
    }
}
