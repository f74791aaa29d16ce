//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;
use std::time::Instant;

use super::error::{ApiError, ApiResult};
use crate::backend::{Backend, Session};
use crate::config::ApiConfig;
use crate::portal::{GateOutcome, SessionGate};
use crate::websocket::{HubConfig, SessionHub};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Hosted backend (or its in-process stand-in)
    pub backend: Arc<dyn Backend>,
    /// Session gate over the backend
    pub gate: SessionGate,
    /// Open session-change sockets
    pub hub: Arc<SessionHub>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state and start forwarding backend auth events to the hub
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(backend: Arc<dyn Backend>, config: ApiConfig, hub_config: HubConfig) -> Self {
        let hub = Arc::new(SessionHub::new(hub_config));
        hub.forward(backend.subscribe());

        Self {
            gate: SessionGate::new(Arc::clone(&backend)),
            backend,
            hub,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Resolve a token or fail with `SessionRequired`
    pub async fn require_session(&self, access_token: Option<&str>) -> ApiResult<Session> {
        match self.gate.check(access_token).await? {
            GateOutcome::Granted(session) => Ok(session),
            GateOutcome::Redirect { .. } => Err(ApiError::SessionRequired),
        }
    }
}

/// Bearer token of the request, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor for handlers behind the session gate
///
/// Rejects with 401 `SESSION_REQUIRED` (and `redirect: "/auth"`) when the
/// request carries no live session.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map(str::to_string);
        state.require_session(token.as_deref()).await.map(CurrentSession)
    }
}

/// Session if one was presented; never rejects for a missing one
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map(str::to_string);
        let outcome = state.gate.check(token.as_deref()).await?;
        Ok(MaybeSession(outcome.session().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(AUTHORIZATION, value.parse().unwrap());
        }
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&headers(Some("bearer abc "))), Some("abc"));
        assert_eq!(bearer_token(&headers(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&headers(Some("Bearer "))), None);
        assert_eq!(bearer_token(&headers(None)), None);
    }
}
