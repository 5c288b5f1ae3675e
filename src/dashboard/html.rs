//! HTML rendering
//!
//! Server-side rendering of a [`SectionView`] into a complete page: the
//! sidebar, the heading and each panel. Charts are embedded as inline SVG.

use std::fmt::Write;

use super::cards::{CardStatus, MetricCard, Trend};
use super::nav::{Section, NAV_ITEMS};
use super::shell::{ChartPanel, Panel, SectionView};
use crate::chart::{escape, render_svg};

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;background:#f8fafc;color:#111827;display:flex;min-height:100vh}
nav{width:16rem;background:#fff;border-right:1px solid #e5e7eb;display:flex;flex-direction:column}
nav.collapsed{width:4rem}
nav header{padding:1rem;border-bottom:1px solid #e5e7eb;display:flex;justify-content:space-between;align-items:center}
nav a{display:block;padding:.75rem 1rem;margin:.25rem .5rem;border-radius:.375rem;color:#374151;text-decoration:none}
nav a.active{background:#3B82F6;color:#fff}
nav footer{margin-top:auto;padding:1rem;border-top:1px solid #e5e7eb;font-size:.85rem}
main{flex:1;padding:1.5rem;overflow:auto}
.cards{display:grid;grid-template-columns:repeat(auto-fit,minmax(12rem,1fr));gap:1.5rem;margin-bottom:1.5rem}
.card{background:#fff;border-radius:.5rem;box-shadow:0 1px 4px rgba(0,0,0,.08);padding:1rem;border-top:4px solid #10B981}
.card.warning{border-top-color:#EF4444}.card.error{border-top-color:#DC2626}
.card .value{font-size:1.5rem;font-weight:700}
.trend.up{color:#10B981}.trend.down{color:#EF4444}.trend.stable{color:#6B7280}
.chart{background:#fff;border-radius:.5rem;box-shadow:0 1px 4px rgba(0,0,0,.08);padding:1rem;margin-bottom:1.5rem}
.plot{display:flex;gap:.5rem}.plot .y{display:flex;flex-direction:column;justify-content:space-between;font-size:.75rem;color:#6B7280}
.x{display:flex;justify-content:space-between;font-size:.75rem;color:#6B7280;margin-top:.25rem}
.placeholder{text-align:center;padding:5rem 0;color:#6B7280}
"#;

/// Page-level options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Sidebar expanded
    pub expanded: bool,
    /// Auto-refresh period in seconds; `None` disables it
    pub refresh_secs: Option<u64>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            expanded: true,
            refresh_secs: Some(1),
        }
    }
}

/// Render a full HTML document
pub fn render_page(view: &SectionView, options: PageOptions) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    if let Some(secs) = options.refresh_secs {
        let _ = write!(html, "<meta http-equiv=\"refresh\" content=\"{}\">", secs.max(1));
    }
    let _ = write!(
        html,
        "<title>DSTAT · {}</title><style>{}</style></head><body>",
        escape(&view.heading),
        STYLE
    );

    render_nav(&mut html, view.section, options.expanded);

    html.push_str("<main>");
    let _ = write!(html, "<h1>{}</h1>", escape(&view.heading));
    if let Some(status) = &view.status {
        let _ = write!(html, "<p class=\"status\">Status: {}</p>", escape(status));
    }
    for panel in &view.panels {
        render_panel(&mut html, panel);
    }
    html.push_str("</main></body></html>");

    html
}

fn render_nav(html: &mut String, active: Section, expanded: bool) {
    let toggle = if expanded { "collapsed" } else { "expanded" };
    let _ = write!(
        html,
        "<nav class=\"{}\"><header>{}<a href=\"{}?nav={}\" title=\"Toggle navigation\">{}</a></header>",
        if expanded { "expanded" } else { "collapsed" },
        if expanded { "<div><strong>DSTAT</strong><br><small>Monitoring</small></div>" } else { "" },
        section_href(active),
        toggle,
        if expanded { "&laquo;" } else { "&raquo;" },
    );

    let query = if expanded { "" } else { "?nav=collapsed" };
    for section in NAV_ITEMS {
        let class = if section == active { " class=\"active\"" } else { "" };
        let text = if expanded { section.label() } else { &section.label()[..1] };
        let _ = write!(
            html,
            "<a href=\"{}{}\"{} data-icon=\"{}\">{}</a>",
            section_href(section),
            query,
            class,
            section.icon(),
            escape(text)
        );
    }

    if expanded {
        html.push_str("<footer><strong>Online</strong><br>All systems operational</footer>");
    }
    html.push_str("</nav>");
}

fn section_href(section: Section) -> String {
    if section == Section::Dashboard {
        "/".to_string()
    } else {
        format!("/section/{}", section.id())
    }
}

fn render_panel(html: &mut String, panel: &Panel) {
    match panel {
        Panel::Cards(cards) => {
            html.push_str("<div class=\"cards\">");
            for card in cards {
                render_card(html, card);
            }
            html.push_str("</div>");
        }
        Panel::Chart(chart) => render_chart(html, chart),
        Panel::Placeholder { title, message } => {
            let _ = write!(
                html,
                "<div class=\"placeholder\"><h2>{}</h2><p>{}</p></div>",
                escape(title),
                escape(message)
            );
        }
    }
}

fn render_card(html: &mut String, card: &MetricCard) {
    let status_class = match card.status {
        CardStatus::Healthy => "healthy",
        CardStatus::Warning => "warning",
        CardStatus::Error => "error",
    };
    let _ = write!(
        html,
        "<div class=\"card {}\" data-icon=\"{}\"><div class=\"title\">{}</div><div class=\"value\">{}</div>",
        status_class,
        escape(&card.icon),
        escape(&card.title),
        escape(&card.value)
    );
    if let Some(trend_value) = &card.trend_value {
        let trend_class = match card.trend {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        let _ = write!(
            html,
            "<div class=\"trend {}\">{} {}</div>",
            trend_class,
            card.trend.symbol(),
            escape(trend_value)
        );
    }
    let _ = write!(html, "<div class=\"badge\">{}</div></div>", card.status);
}

fn render_chart(html: &mut String, chart: &ChartPanel) {
    let frame = &chart.frame;
    let _ = write!(
        html,
        "<section class=\"chart\"><h3>{}</h3><div class=\"plot\"><div class=\"y\" style=\"height:{}px\"><span>{}</span><span>{}</span><span>{}</span></div><div style=\"flex:1;height:{}px\">{}</div></div>",
        escape(&chart.title),
        chart.height,
        escape(&frame.y_labels.start),
        escape(&frame.y_labels.middle),
        escape(&frame.y_labels.end),
        chart.height,
        render_svg(frame, &chart.style)
    );
    let _ = write!(
        html,
        "<div class=\"x\"><span>{}</span><span>{}</span><span>{}</span></div></section>",
        escape(&frame.x_labels.start),
        escape(&frame.x_labels.middle),
        escape(&frame.x_labels.end)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{AxisLabels, ChartFrame, ChartStyle};

    fn view(panels: Vec<Panel>) -> SectionView {
        SectionView {
            section: Section::Dashboard,
            heading: "Real Analytics Dashboard".to_string(),
            panels,
            status: Some("healthy".to_string()),
        }
    }

    #[test]
    fn test_page_has_nav_and_refresh() {
        let html = render_page(&view(vec![]), PageOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("http-equiv=\"refresh\" content=\"1\""));
        for section in NAV_ITEMS {
            assert!(html.contains(section.label()));
        }
        assert!(html.contains("class=\"active\""));
        assert!(html.contains("Status: healthy"));
    }

    #[test]
    fn test_collapsed_nav_links_keep_state() {
        let html = render_page(
            &view(vec![]),
            PageOptions {
                expanded: false,
                refresh_secs: None,
            },
        );

        assert!(!html.contains("http-equiv"));
        assert!(html.contains("/section/charts?nav=collapsed"));
        assert!(!html.contains("All systems operational"));
    }

    #[test]
    fn test_cards_and_placeholder() {
        let card = MetricCard::new("Error rate", "3.1%", "alert-triangle").status(CardStatus::Warning);
        let html = render_page(
            &view(vec![
                Panel::Cards(vec![card]),
                Panel::Placeholder {
                    title: "Alerts".to_string(),
                    message: "Coming soon".to_string(),
                },
            ]),
            PageOptions::default(),
        );

        assert!(html.contains("card warning"));
        assert!(html.contains("3.1%"));
        assert!(html.contains("Coming soon"));
    }

    #[test]
    fn test_chart_labels_are_escaped() {
        let frame = ChartFrame {
            x_labels: AxisLabels {
                start: "<a>".to_string(),
                middle: "b".to_string(),
                end: "c".to_string(),
            },
            ..Default::default()
        };
        let html = render_page(
            &view(vec![Panel::Chart(ChartPanel {
                title: "RPS".to_string(),
                height: 300,
                style: ChartStyle::default(),
                frame,
            })]),
            PageOptions::default(),
        );

        assert!(html.contains("&lt;a&gt;"));
        assert!(html.contains("<svg"));
        assert!(html.contains("height:300px"));
    }
}
