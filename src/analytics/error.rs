//! Analytics reporting error types
//!
//! None of these reach the view layer; the reporter logs and drops them.

use thiserror::Error;

use crate::metrics::FailureKind;

/// Errors that can occur while delivering an analytics event
#[derive(Error, Debug)]
pub enum ReportError {
    /// HTTP client failure (connect, timeout, body read)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was present but not JSON
    #[error("Malformed response: {0}")]
    Parse(String),

    /// Event could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ReportError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ReportError::Parse(_) | ReportError::Serialization(_) => FailureKind::Parse,
            _ => FailureKind::Transport,
        }
    }
}

/// Result type alias for analytics operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_kind() {
        let err = ReportError::Status {
            status: 400,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: bad");
        assert_eq!(err.kind(), FailureKind::Transport);
        assert_eq!(ReportError::Parse("eof".into()).kind(), FailureKind::Parse);
    }

    #[test]
    fn test_serialization_is_a_parse_failure() {
        let err = ReportError::Serialization("key must be a string".to_string());
        assert_eq!(err.kind(), FailureKind::Parse);
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
