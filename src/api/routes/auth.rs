//! Auth Routes
//!
//! Session endpoints backed by the hosted auth service.
//!
//! - GET /api/v1/session - Current session, if any
//! - POST /api/v1/auth/sign-in - E-mail/password sign-in
//! - POST /api/v1/auth/sign-up - Register an account
//! - POST /api/v1/auth/refresh - Trade a refresh token for a new session
//! - POST /api/v1/auth/sign-out - Revoke the session and leave for /auth

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{RefreshRequest, SessionResponse, SignOutResponse, SignUpResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::{bearer_token, AppState, MaybeSession};
use crate::backend::{Credentials, Session, SignUp};
use crate::portal::catalog::LOGGED_OUT;
use crate::portal::AUTH_PATH;

/// GET /api/v1/session
///
/// A missing or stale token is not an error here: it reports
/// `authenticated: false`.
pub async fn current_session(MaybeSession(session): MaybeSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: session.is_some(),
        session,
    })
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> ApiResult<Json<Session>> {
    let credentials = Credentials {
        email: validate_email(&req.email)?,
        password: validate_password(&req.password)?,
    };

    let session = state.backend.sign_in(&credentials).await?;
    tracing::info!(user_id = %session.user_id(), "User signed in");
    Ok(Json(session))
}

/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUp>,
) -> ApiResult<(StatusCode, Json<SignUpResponse>)> {
    let request = SignUp {
        email: validate_email(&req.email)?,
        password: validate_password(&req.password)?,
        full_name: req
            .full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
    };

    let session = state.backend.sign_up(&request).await?;
    tracing::info!(
        email = %request.email,
        confirmation_required = session.is_none(),
        "Account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            confirmation_required: session.is_none(),
            session,
        }),
    ))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<Session>> {
    let token = req.refresh_token.trim();
    if token.is_empty() {
        return Err(ApiError::Validation("refresh_token is required".to_string()));
    }

    let session = state.backend.refresh_session(token).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/sign-out
///
/// Always answers with the redirect, even when the backend cannot be
/// reached; a request without a live session has nothing left to revoke.
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SignOutResponse> {
    match state.gate.check(bearer_token(&headers)).await {
        Ok(outcome) => {
            if let Some(session) = outcome.session() {
                match state.backend.sign_out(session).await {
                    Ok(()) => tracing::info!(user_id = %session.user_id(), "User signed out"),
                    Err(e) => tracing::warn!(
                        user_id = %session.user_id(),
                        error = %e,
                        "Backend sign-out failed"
                    ),
                }
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not resolve session at sign-out"),
    }

    Json(SignOutResponse {
        redirect: AUTH_PATH.to_string(),
        message: LOGGED_OUT.to_string(),
    })
}

fn validate_email(email: &str) -> ApiResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation(format!("'{}' is not an e-mail address", email)));
    }
    Ok(email.to_string())
}

fn validate_password(password: &str) -> ApiResult<String> {
    if password.is_empty() {
        return Err(ApiError::Validation("password is required".to_string()));
    }
    Ok(password.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("  a@collo.dev ").unwrap(), "a@collo.dev");
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("").is_err());
        assert_eq!(validate_password(" x ").unwrap(), " x ");
    }
}
