//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::portal::AUTH_PATH;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// No valid session for a protected endpoint
    #[error("Sign in required")]
    SessionRequired,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Hosted backend call failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
    /// Page the client should navigate to, set when the session is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Status code and stable error code of this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::SessionRequired => (StatusCode::UNAUTHORIZED, "SESSION_REQUIRED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Backend(e) => backend_status(e),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    fn redirect(&self) -> Option<&'static str> {
        match self {
            ApiError::SessionRequired | ApiError::Backend(BackendError::SessionExpired) => {
                Some(AUTH_PATH)
            }
            _ => None,
        }
    }
}

fn backend_status(error: &BackendError) -> (StatusCode, &'static str) {
    match error {
        BackendError::Unavailable | BackendError::Timeout => {
            (StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNAVAILABLE")
        }
        BackendError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        BackendError::SessionExpired => (StatusCode::UNAUTHORIZED, "SESSION_REQUIRED"),
        // The backend's own 4xx (e.g. duplicate sign-up) is passed through.
        BackendError::ApiError { status, .. } if (400..500).contains(status) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            "BACKEND_REJECTED",
        ),
        BackendError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "BACKEND_CONFIG"),
        _ => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
            redirect: self.redirect(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_down_is_503() {
        let err = ApiError::from(BackendError::Unavailable);
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNAVAILABLE")
        );
        assert_eq!(
            ApiError::from(BackendError::Timeout).status_and_code().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_backend_failures_map_to_gateway_errors() {
        let err = ApiError::from(BackendError::ApiError {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"));

        let err = ApiError::from(BackendError::Decode("bad row".to_string()));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_backend_client_errors_pass_through() {
        let err = ApiError::from(BackendError::ApiError {
            status: 422,
            message: "User already registered".to_string(),
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::UNPROCESSABLE_ENTITY, "BACKEND_REJECTED")
        );
    }

    #[test]
    fn test_session_errors_redirect_to_auth() {
        assert_eq!(ApiError::SessionRequired.redirect(), Some("/auth"));
        assert_eq!(
            ApiError::from(BackendError::SessionExpired).redirect(),
            Some("/auth")
        );
        assert_eq!(ApiError::from(BackendError::InvalidCredentials).redirect(), None);
    }
}
