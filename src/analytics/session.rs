//! Session identifier
//!
//! One identifier per browsing context, created lazily on first use and
//! kept in a volatile per-context store under a fixed key. It never changes
//! until the store is cleared from outside.
//!
//! ```text
//!   NoSession ──get_or_create()──► HasSession(id)   (terminal)
//! ```

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Storage key for the session identifier
pub const SESSION_STORAGE_KEY: &str = "analytics_session_id";

/// Length of the random suffix in generated ids
const SUFFIX_LEN: usize = 9;

/// Per-context key/value storage (the browser's session storage)
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory store; lives as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored item
    pub fn clear(&self) {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}

/// Where a context stands with respect to its session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    HasSession(String),
}

/// Creates and reuses the per-context session id
#[derive(Clone)]
pub struct SessionIdentifier {
    store: Arc<dyn SessionStore>,
}

impl SessionIdentifier {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Current state without creating anything
    pub fn state(&self) -> SessionState {
        match self.store.get(SESSION_STORAGE_KEY) {
            Some(id) if !id.is_empty() => SessionState::HasSession(id),
            _ => SessionState::NoSession,
        }
    }

    /// Return the stored id, creating and persisting one if absent
    pub fn get_or_create(&self) -> String {
        if let SessionState::HasSession(id) = self.state() {
            return id;
        }

        let id = Self::generate();
        self.store.set(SESSION_STORAGE_KEY, &id);
        tracing::debug!(session_id = %id, "Created analytics session");
        id
    }

    /// New id: `session_<unix millis>_<9 random lowercase alphanumerics>`
    pub fn generate() -> String {
        let random = Uuid::new_v4().simple().to_string();
        format!(
            "session_{}_{}",
            Utc::now().timestamp_millis(),
            &random[..SUFFIX_LEN]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_context_returns_same_id() {
        let store = Arc::new(MemorySessionStore::new());
        let sessions = SessionIdentifier::new(store.clone());

        assert_eq!(sessions.state(), SessionState::NoSession);
        let first = sessions.get_or_create();
        let second = sessions.get_or_create();

        assert_eq!(first, second);
        assert_eq!(sessions.state(), SessionState::HasSession(first.clone()));
        assert_eq!(store.get(SESSION_STORAGE_KEY), Some(first));
    }

    #[test]
    fn test_cleared_store_yields_new_id() {
        let store = Arc::new(MemorySessionStore::new());
        let sessions = SessionIdentifier::new(store.clone());

        let first = sessions.get_or_create();
        store.clear();
        let second = sessions.get_or_create();

        assert_ne!(first, second);
    }

    #[test]
    fn test_existing_id_is_reused() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(SESSION_STORAGE_KEY, "session_1_abcdefghi");

        let sessions = SessionIdentifier::new(store);
        assert_eq!(sessions.get_or_create(), "session_1_abcdefghi");
    }

    #[test]
    fn test_generated_format() {
        let id = SessionIdentifier::generate();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
