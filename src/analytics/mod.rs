//! Page-view analytics
//!
//! Best-effort reporting of page views and page exits to a remote endpoint,
//! correlated by a per-context session id.
//!
//! ## Architecture
//!
//! - **Session**: lazily created id kept in a [`SessionStore`]
//! - **Environment**: injected view of the context (path, referrer, screen, agent)
//! - **Transport**: awaited JSON POST plus a fire-and-forget beacon
//! - **Reporter**: mounts onto a navigation stream and reports each event
//!
//! ## Events
//!
//! | When | Record | Delivery |
//! |------|--------|----------|
//! | mount, navigation | [`PageViewEvent`] | POST, response to callback |
//! | unload | [`PageExitEvent`] | beacon, exactly once |

mod environment;
mod error;
mod events;
mod reporter;
mod session;
mod transport;

pub use environment::{default_user_agent, Environment, FixedEnvironment, Location, TerminalEnvironment};
pub use error::{ReportError, ReportResult};
pub use events::{PageExitEvent, PageViewEvent, PAGE_EXIT_EVENT};
pub use reporter::{MountedReporter, PageViewCallback, PageViewReporter};
pub use session::{MemorySessionStore, SessionIdentifier, SessionState, SessionStore, SESSION_STORAGE_KEY};
pub use transport::{HttpTransport, Transport};
