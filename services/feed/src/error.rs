//! Error types for the feed service

use thiserror::Error;

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Main error type for feed connection operations.
///
/// All connection-scoped failures are handled inside the lifecycle manager
/// (backoff + retry); they never surface to callers of `connect()`.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Negotiation endpoint returned an error or an unusable response
    #[error("negotiation failed: {reason}")]
    Negotiation {
        /// Reason for the failure
        reason: String,
    },

    /// Negotiation response carried no connection token
    #[error("negotiation response missing ConnectionToken")]
    MissingToken,

    /// Transport connect or send failure
    #[error("connection failed: {reason}")]
    Connection {
        /// Reason for the failure
        reason: String,
    },

    /// A bounded operation did not complete in time
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// The operation that timed out
        operation: &'static str,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// HTTP error during negotiation
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Endpoint URL could not be parsed
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error in feed settings
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FeedError {
    /// Whether this error is recoverable through reconnection. Everything a
    /// flaky network can produce is; only misconfiguration is not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FeedError::Configuration(_) | FeedError::Url(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability_classification() {
        assert!(FeedError::MissingToken.is_recoverable());
        assert!(FeedError::Timeout {
            operation: "negotiation",
            timeout_ms: 15000
        }
        .is_recoverable());
        assert!(!FeedError::Configuration("empty hub name".to_string()).is_recoverable());
    }
}
