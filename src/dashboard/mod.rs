//! Dashboard composition
//!
//! - **nav**: sections and sidebar state
//! - **cards**: metric cards derived from aggregates
//! - **shell**: selected section → visible panels
//! - **html** / **term**: renderers for the server and the terminal

pub mod cards;
pub mod html;
pub mod nav;
pub mod shell;
pub mod term;

pub use cards::{CardStatus, MetricCard, Trend, ERROR_RATE_WARNING_THRESHOLD};
pub use html::{render_page, PageOptions};
pub use nav::{Navigation, Section, NAV_ITEMS};
pub use shell::{compose, spawn_series_feed, ChartLayout, ChartPanel, DashboardShell, Panel, SectionView, ShellStatus};
pub use term::render_screen;
