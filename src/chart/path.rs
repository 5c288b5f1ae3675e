//! Series path generation
//!
//! Maps an ordered [`Series`] into SVG path data inside a normalized box.
//!
//! ```text
//!   y = 0   ┌──────────────────────────┐
//!           │  top margin (20% of H)   │
//!   y = 20  │ ─ ─ ─ ─ max value ─ ─ ─ ─│
//!           │                          │
//!   y = H   └──── min value ───────────┘
//!          x = 0                     x = W
//! ```
//!
//! `x = index * W / max(count - 1, 1)` and
//! `y = H - (value - min) / range * (H * 0.8)`, where `range` clamps to 1
//! when every value is equal.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::model::Series;

/// Share of the box height the data may occupy; the rest is top margin
const PLOT_FRACTION: f64 = 0.8;

/// How consecutive vertices are joined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Straight `L` segments
    Linear,
    /// Cubic `C` segments with control points at one and two thirds of each step
    #[default]
    Smooth,
}

impl std::str::FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Interpolation::Linear),
            "smooth" => Ok(Interpolation::Smooth),
            other => Err(format!("Unknown interpolation: {}", other)),
        }
    }
}

/// Normalized drawing box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartBox {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// A vertex in box coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// Value range used to scale a series vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    /// Scale spanning the series' own min and max; `None` for an empty series
    pub fn of(series: &Series) -> Option<Self> {
        Some(Self {
            min: series.min()?,
            max: series.max()?,
        })
    }

    /// `max - min`, or 1 for a flat series
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }
}

/// Output of the path builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPaths {
    /// Stroke path through every vertex
    pub line: String,
    /// `line` closed down to the baseline, for the area fill
    pub area: String,
    /// Vertex positions (identical for both interpolation policies)
    pub vertices: Vec<Vertex>,
}

impl ChartPaths {
    /// True when there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Position of the right-most data marker
    pub fn last_vertex(&self) -> Option<Vertex> {
        self.vertices.last().copied()
    }
}

/// Builds line and area paths for a series
#[derive(Debug, Clone, Copy, Default)]
pub struct PathBuilder {
    bounds: ChartBox,
    interpolation: Interpolation,
}

impl PathBuilder {
    /// Create a builder for the default 100x100 box
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            bounds: ChartBox::default(),
            interpolation,
        }
    }

    /// Builder method: use a different box
    pub fn bounds(mut self, bounds: ChartBox) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn chart_box(&self) -> ChartBox {
        self.bounds
    }

    /// Vertical position of `value` under `scale`
    pub fn y_for(&self, value: f64, scale: &ValueScale) -> f64 {
        self.bounds.height - ((value - scale.min) / scale.range()) * (self.bounds.height * PLOT_FRACTION)
    }

    /// Vertex positions for a series scaled to its own range
    pub fn vertices(&self, series: &Series) -> Vec<Vertex> {
        match ValueScale::of(series) {
            Some(scale) => self.vertices_with_scale(series, &scale),
            None => Vec::new(),
        }
    }

    /// Vertex positions for a series under an explicit scale
    ///
    /// A single point yields two vertices spanning the full width.
    pub fn vertices_with_scale(&self, series: &Series, scale: &ValueScale) -> Vec<Vertex> {
        let points = series.points();
        match points.len() {
            0 => Vec::new(),
            1 => {
                let y = self.y_for(points[0].value, scale);
                vec![Vertex { x: 0.0, y }, Vertex { x: self.bounds.width, y }]
            }
            n => {
                let step = self.bounds.width / (n - 1) as f64;
                points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Vertex {
                        x: i as f64 * step,
                        y: self.y_for(p.value, scale),
                    })
                    .collect()
            }
        }
    }

    /// Build the line and area paths, scaling to the series' own range
    pub fn build(&self, series: &Series) -> ChartPaths {
        match ValueScale::of(series) {
            Some(scale) => self.build_with_scale(series, &scale),
            None => ChartPaths::default(),
        }
    }

    /// Build the line and area paths under an explicit scale
    pub fn build_with_scale(&self, series: &Series, scale: &ValueScale) -> ChartPaths {
        let vertices = self.vertices_with_scale(series, scale);
        if vertices.is_empty() {
            return ChartPaths::default();
        }

        let line = if series.len() == 1 {
            // A lone point is always a straight horizontal segment
            let (a, b) = (vertices[0], vertices[1]);
            format!("M {} {} L {} {}", a.x, a.y, b.x, b.y)
        } else {
            self.join(&vertices)
        };

        let area = format!(
            "{} L {} {} L 0 {} Z",
            line, self.bounds.width, self.bounds.height, self.bounds.height
        );

        ChartPaths {
            line,
            area,
            vertices,
        }
    }

    fn join(&self, vertices: &[Vertex]) -> String {
        let first = vertices[0];
        let mut path = format!("M {} {}", first.x, first.y);

        for pair in vertices.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let _ = match self.interpolation {
                Interpolation::Linear => write!(path, " L {} {}", next.x, next.y),
                Interpolation::Smooth => {
                    let dx = next.x - current.x;
                    write!(
                        path,
                        " C {} {}, {} {}, {} {}",
                        current.x + dx / 3.0,
                        current.y,
                        current.x + 2.0 * dx / 3.0,
                        next.y,
                        next.x,
                        next.y
                    )
                }
            };
        }

        path
    }
}
