//! Session gate
//!
//! Protected pages ask for the current session before fetching anything.
//! No session means a redirect to `/auth`, never an error.

use std::sync::Arc;

use super::routes::AUTH_PATH;
use crate::backend::{Backend, BackendResult, Session};

/// Result of running the gate
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Session present; the page may fetch its data
    Granted(Session),
    /// No session; render nothing and go here instead
    Redirect { to: &'static str },
}

impl GateOutcome {
    fn redirect() -> Self {
        GateOutcome::Redirect { to: AUTH_PATH }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            GateOutcome::Granted(session) => Some(session),
            GateOutcome::Redirect { .. } => None,
        }
    }
}

/// Resolves bearer tokens to sessions through the backend
#[derive(Clone)]
pub struct SessionGate {
    backend: Arc<dyn Backend>,
}

impl SessionGate {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Run the gate for an optional access token
    pub async fn check(&self, access_token: Option<&str>) -> BackendResult<GateOutcome> {
        let token = match access_token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return Ok(GateOutcome::redirect()),
        };

        let outcome = match self.backend.get_session(token).await? {
            Some(session) if !session.is_expired_at(chrono::Utc::now()) => {
                GateOutcome::Granted(session)
            }
            Some(session) => {
                tracing::debug!(user_id = %session.user_id(), "Session expired, redirecting");
                GateOutcome::redirect()
            }
            None => GateOutcome::redirect(),
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Credentials, MemoryBackend};

    async fn signed_in() -> (Arc<MemoryBackend>, Session) {
        let backend = Arc::new(MemoryBackend::new());
        backend.create_account("a@collo.dev", "secret1", None).await;
        let session = backend
            .sign_in(&Credentials {
                email: "a@collo.dev".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        (backend, session)
    }

    #[tokio::test]
    async fn test_no_token_redirects() {
        let gate = SessionGate::new(Arc::new(MemoryBackend::new()));
        assert_eq!(
            gate.check(None).await.unwrap(),
            GateOutcome::Redirect { to: "/auth" }
        );
        assert_eq!(
            gate.check(Some("  ")).await.unwrap(),
            GateOutcome::Redirect { to: "/auth" }
        );
    }

    #[tokio::test]
    async fn test_unknown_token_redirects() {
        let gate = SessionGate::new(Arc::new(MemoryBackend::new()));
        let outcome = gate.check(Some("forged")).await.unwrap();
        assert!(outcome.session().is_none());
    }

    #[tokio::test]
    async fn test_valid_token_granted() {
        let (backend, session) = signed_in().await;
        let gate = SessionGate::new(backend);
        let outcome = gate.check(Some(&session.access_token)).await.unwrap();
        assert_eq!(outcome.session().map(|s| s.user_id()), Some(session.user_id()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_offline(true);
        let gate = SessionGate::new(backend);
        assert!(gate.check(Some("token")).await.is_err());
    }
}
