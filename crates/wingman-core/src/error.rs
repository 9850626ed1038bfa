//! Error types for the Wingman analysis pipeline.

use thiserror::Error;

/// Result type alias using the pipeline's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pipeline operations.
///
/// Every failure the orchestrator can surface maps onto exactly one of
/// these variants, so the API layer can translate them into a stable
/// HTTP classification without inspecting message text.
#[derive(Error, Debug)]
pub enum Error {
    /// No valid credential was presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid credential, but the caller does not own the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed request payload or unrecognized object reference.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The external analysis service reported a terminal failure.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// The external operation did not reach a terminal state in time.
    #[error("Analysis timed out after {elapsed_secs}s (operation {operation})")]
    Timeout {
        /// Operation name assigned by the external service.
        operation: String,
        /// Seconds spent waiting before giving up.
        elapsed_secs: u64,
    },

    /// Database operation failed (wraps sqlx::Error).
    #[error("Storage error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP/network request failed.
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unauthorized() {
        let err = Error::Unauthorized("no credential".to_string());
        assert_eq!(err.to_string(), "Unauthorized: no credential");
    }

    #[test]
    fn test_error_display_forbidden() {
        let err = Error::Forbidden("session owned by another user".to_string());
        assert_eq!(
            err.to_string(),
            "Forbidden: session owned by another user"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("videoUri is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: videoUri is required");
    }

    #[test]
    fn test_error_display_analysis_failed() {
        let err = Error::AnalysisFailed("input video unreadable".to_string());
        assert_eq!(err.to_string(), "Analysis failed: input video unreadable");
    }

    #[test]
    fn test_error_display_timeout() {
        let err = Error::Timeout {
            operation: "operations/abc123".to_string(),
            elapsed_secs: 300,
        };
        assert_eq!(
            err.to_string(),
            "Analysis timed out after 300s (operation operations/abc123)"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
