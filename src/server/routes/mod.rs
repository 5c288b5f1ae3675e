//! Route handlers organized by functionality.

pub mod chart;
pub mod dashboard;
pub mod health;
pub mod snapshot;
