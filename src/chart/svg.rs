//! SVG rendering
//!
//! Turns a [`ChartFrame`] into an inline `<svg>` element drawn in the
//! normalized 100x100 box: grid lines, gradient area fill, the line itself
//! and a marker on the latest point. Axis labels are left to the page.

use std::fmt::Write;

use super::view::ChartFrame;

/// Default series color
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Grid line positions (y) in box coordinates
const GRID_LINES: [u32; 5] = [20, 40, 60, 80, 100];

/// Visual options for one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Stroke and fill color
    pub color: String,
    /// Id for the gradient definition; must be unique within a page
    pub gradient_id: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            gradient_id: "areaGradient".to_string(),
        }
    }
}

impl ChartStyle {
    pub fn new(color: impl Into<String>, gradient_id: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            gradient_id: gradient_id.into(),
        }
    }
}

/// Render a frame as an `<svg>` element
pub fn render_svg(frame: &ChartFrame, style: &ChartStyle) -> String {
    let color = escape(&style.color);
    let gradient = escape(&style.gradient_id);
    let mut svg = String::with_capacity(1024);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 100 100" preserveAspectRatio="none" style="overflow:visible">"#
    );
    let _ = write!(
        svg,
        r#"<defs><linearGradient id="{gradient}" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="{color}" stop-opacity="0.3"/><stop offset="100%" stop-color="{color}" stop-opacity="0.05"/></linearGradient></defs>"#
    );

    for y in GRID_LINES {
        let _ = write!(
            svg,
            r##"<line x1="0" y1="{y}" x2="100" y2="{y}" stroke="#e5e7eb" stroke-width="0.5" vector-effect="non-scaling-stroke"/>"##
        );
    }

    if !frame.paths.is_empty() {
        let _ = write!(
            svg,
            r#"<path class="area" d="{}" fill="url(#{gradient})"/>"#,
            frame.paths.area
        );
        let _ = write!(
            svg,
            r#"<path class="line" d="{}" fill="none" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" vector-effect="non-scaling-stroke"/>"#,
            frame.paths.line
        );
    }

    if let Some(last) = frame.paths.last_vertex() {
        let _ = write!(
            svg,
            r#"<g class="marker"><circle cx="{x}" cy="{y}" r="2" fill="{color}"/><circle cx="{x}" cy="{y}" r="4" fill="{color}" fill-opacity="0.4"/></g>"#,
            x = last.x,
            y = last.y
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Escape text for use in HTML/SVG content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
