//! Navigation state
//!
//! Which section is selected and whether the sidebar is expanded.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A top-level dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Charts,
    Stats,
    Alerts,
    History,
    Settings,
}

/// Navigation items in display order
pub const NAV_ITEMS: [Section; 6] = [
    Section::Dashboard,
    Section::Charts,
    Section::Stats,
    Section::Alerts,
    Section::History,
    Section::Settings,
];

impl Section {
    pub fn id(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Charts => "charts",
            Section::Stats => "stats",
            Section::Alerts => "alerts",
            Section::History => "history",
            Section::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Home",
            Section::Charts => "Charts",
            Section::Stats => "Statistics",
            Section::Alerts => "Alerts",
            Section::History => "History",
            Section::Settings => "Settings",
        }
    }

    /// Icon name
    pub fn icon(&self) -> &'static str {
        match self {
            Section::Dashboard => "home",
            Section::Charts => "area-chart",
            Section::Stats => "bar-chart",
            Section::Alerts => "bell",
            Section::History => "history",
            Section::Settings => "settings",
        }
    }

    /// Page path used for routing and analytics, e.g. "/charts"
    pub fn path(&self) -> String {
        format!("/{}", self.id())
    }

    /// Sections without content yet
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Section::Alerts | Section::History | Section::Settings)
    }

    /// Resolve an id; anything unknown falls back to the dashboard
    pub fn from_id(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }

    /// 1-based position in [`NAV_ITEMS`]
    pub fn from_position(position: usize) -> Option<Self> {
        position.checked_sub(1).and_then(|i| NAV_ITEMS.get(i).copied())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().trim_start_matches('/').to_lowercase();
        NAV_ITEMS
            .iter()
            .copied()
            .find(|section| section.id() == id)
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Sidebar state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    active: Section,
    expanded: bool,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            active: Section::Dashboard,
            expanded: true,
        }
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Select a section; returns true when the selection changed
    pub fn select(&mut self, section: Section) -> bool {
        let changed = self.active != section;
        self.active = section;
        changed
    }

    /// Collapse or expand the sidebar
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_ids_round_trip() {
        for section in NAV_ITEMS {
            assert_eq!(section.id().parse::<Section>().unwrap(), section);
        }
        assert_eq!("/charts".parse::<Section>().unwrap(), Section::Charts);
    }

    #[test]
    fn test_unknown_section_falls_back() {
        assert_eq!(Section::from_id("nope"), Section::Dashboard);
        assert_eq!(Section::from_id(""), Section::Dashboard);
        assert!("nope".parse::<Section>().is_err());
    }

    #[test]
    fn test_from_position() {
        assert_eq!(Section::from_position(1), Some(Section::Dashboard));
        assert_eq!(Section::from_position(6), Some(Section::Settings));
        assert_eq!(Section::from_position(0), None);
        assert_eq!(Section::from_position(7), None);
    }

    #[test]
    fn test_placeholders() {
        let placeholders: Vec<_> = NAV_ITEMS.iter().filter(|s| s.is_placeholder()).collect();
        assert_eq!(placeholders.len(), 3);
        assert!(!Section::Stats.is_placeholder());
    }

    #[test]
    fn test_navigation_select_and_toggle() {
        let mut nav = Navigation::new();
        assert_eq!(nav.active(), Section::Dashboard);
        assert!(nav.is_expanded());

        assert!(nav.select(Section::Charts));
        assert!(!nav.select(Section::Charts));
        assert_eq!(nav.active().path(), "/charts");

        assert!(!nav.toggle());
        assert!(nav.toggle());
    }
}
