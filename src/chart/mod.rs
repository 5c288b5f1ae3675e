//! Live line chart
//!
//! - **path**: Series → SVG path data (line + area) in a normalized box
//! - **view**: Pending/committed series with a delayed, cancellable swap
//! - **svg**: Frame → inline `<svg>` markup
//!
//! # Example
//!
//! ```rust
//! use dstat::chart::{Interpolation, PathBuilder};
//! use dstat::model::{DataPoint, Series};
//!
//! let series: Series = vec![
//!     DataPoint::labelled(5.0, "a"),
//!     DataPoint::labelled(15.0, "b"),
//!     DataPoint::labelled(5.0, "c"),
//! ]
//! .into();
//!
//! let paths = PathBuilder::new(Interpolation::Linear).build(&series);
//! assert_eq!(paths.line, "M 0 100 L 50 20 L 100 100");
//! assert!(paths.area.ends_with("L 100 100 L 0 100 Z"));
//! ```

pub mod path;
pub mod svg;
pub mod view;

pub use path::{ChartBox, ChartPaths, Interpolation, PathBuilder, ValueScale, Vertex};
pub use svg::{escape, render_svg, ChartStyle, DEFAULT_COLOR};
pub use view::{AxisLabels, ChartFrame, LiveSeriesView, DEFAULT_TRANSITION_DELAY};
