//! Backend collaborator error types
//!
//! Errors raised while talking to the hosted auth/database service.

use thiserror::Error;

/// Errors that can occur when calling the hosted backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    /// Request did not complete in time
    #[error("Request timeout")]
    Timeout,

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Sign-in rejected
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Session token rejected where one was required
    #[error("Session expired or revoked")]
    SessionExpired,

    /// Response body did not match the expected row shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Backend is not configured (missing URL or key)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackendError {
    /// Classify a reqwest failure the way every backend call does
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Unavailable
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Request(err)
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::ApiError {
            status: 400,
            message: "bad filter".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: bad filter");
        assert_eq!(
            BackendError::InvalidCredentials.to_string(),
            "Invalid login credentials"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: BackendError = json_err.into();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
