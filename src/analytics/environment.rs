//! Environment capabilities
//!
//! What the reporter needs to know about the context it runs in, behind a
//! trait so it can be exercised without a real browsing context.

use std::sync::Mutex;
use std::time::Instant;
use tokio::sync::watch;

/// Navigation and device facts about the current context
pub trait Environment: Send + Sync {
    /// Current page path, e.g. "/charts"
    fn page_path(&self) -> String;

    /// Where the user came from; empty when unknown
    fn referrer(&self) -> String;

    /// "<width>x<height>"
    fn screen_resolution(&self) -> String;

    fn user_agent(&self) -> String;

    /// Milliseconds since the context started
    fn elapsed_ms(&self) -> u64;
}

/// Default user agent for this crate's binaries
pub fn default_user_agent() -> String {
    format!(
        "dstat/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Environment with explicitly set values
pub struct FixedEnvironment {
    page: Mutex<String>,
    referrer: String,
    screen_resolution: String,
    user_agent: String,
    started: Instant,
}

impl FixedEnvironment {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: Mutex::new(page.into()),
            referrer: String::new(),
            screen_resolution: "unknown".to_string(),
            user_agent: default_user_agent(),
            started: Instant::now(),
        }
    }

    /// Builder method: set referrer
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    /// Builder method: set screen resolution
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_resolution = format!("{}x{}", width, height);
        self
    }

    /// Builder method: set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn set_page(&self, page: impl Into<String>) {
        *self.page.lock().unwrap_or_else(|p| p.into_inner()) = page.into();
    }
}

impl Environment for FixedEnvironment {
    fn page_path(&self) -> String {
        self.page.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn referrer(&self) -> String {
        self.referrer.clone()
    }

    fn screen_resolution(&self) -> String {
        self.screen_resolution.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Current location inside the terminal dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub referrer: String,
}

/// Environment of the terminal dashboard
///
/// Navigation updates the location and notifies subscribers, which is how
/// the reporter learns about history changes.
pub struct TerminalEnvironment {
    location: watch::Sender<Location>,
    started: Instant,
}

impl TerminalEnvironment {
    pub fn new(initial_path: impl Into<String>) -> Self {
        let (location, _rx) = watch::channel(Location {
            path: initial_path.into(),
            referrer: String::new(),
        });
        Self {
            location,
            started: Instant::now(),
        }
    }

    /// Move to `path`; the previous path becomes the referrer
    ///
    /// Returns false (and notifies nobody) when already there.
    pub fn navigate(&self, path: &str) -> bool {
        self.location.send_if_modified(|location| {
            if location.path == path {
                return false;
            }
            location.referrer = std::mem::replace(&mut location.path, path.to_string());
            true
        })
    }

    pub fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    /// Notifications for each navigation
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }
}

impl Environment for TerminalEnvironment {
    fn page_path(&self) -> String {
        self.location.borrow().path.clone()
    }

    fn referrer(&self) -> String {
        self.location.borrow().referrer.clone()
    }

    fn screen_resolution(&self) -> String {
        let dim = |name: &str| std::env::var(name).ok().and_then(|v| v.parse::<u32>().ok());
        match (dim("COLUMNS"), dim("LINES")) {
            (Some(cols), Some(lines)) => format!("{}x{}", cols, lines),
            _ => "unknown".to_string(),
        }
    }

    fn user_agent(&self) -> String {
        default_user_agent()
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
