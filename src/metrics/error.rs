//! Metrics fetch error types

use thiserror::Error;

/// Errors that can occur while fetching a snapshot
#[derive(Error, Debug)]
pub enum FetchError {
    /// Endpoint could not be reached
    #[error("Metrics endpoint unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other HTTP client failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not decode to a snapshot
    #[error("Malformed snapshot: {0}")]
    Parse(String),

    /// Body decoded but the series breaks its invariants
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// Coarse failure class: the network failed, or the payload was wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Parse => write!(f, "parse"),
        }
    }
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Parse(_) | FetchError::InvalidSeries(_) => FailureKind::Parse,
            FetchError::Request(e) if e.is_decode() => FailureKind::Parse,
            _ => FailureKind::Transport,
        }
    }

    /// Classify a reqwest error the way every client in this crate does
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable
        } else {
            FetchError::Request(err)
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

/// Result type alias for metrics operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "API error 502: bad gateway");
        assert_eq!(FetchError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(FetchError::Unavailable.kind(), FailureKind::Transport);
        assert_eq!(FetchError::Timeout.kind(), FailureKind::Transport);
        assert_eq!(FetchError::Parse("x".into()).kind(), FailureKind::Parse);
        assert_eq!(FetchError::InvalidSeries("x".into()).kind(), FailureKind::Parse);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
