//! Hosted backend client
//!
//! `Backend` implementation over the Supabase-style REST surface:
//! GoTrue under `/auth/v1` and PostgREST under `/rest/v1`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::error::{BackendError, BackendResult};
use super::query::{Direction, TableQuery};
use super::types::{AuthEvent, AuthUser, CampusLocation, Profile, Review, Service, Session};
use super::{Backend, Credentials, ServiceFilter, SignUp};

/// Configuration for the hosted backend client
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://abcd.supabase.co")
    pub url: String,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Capacity of the session-change channel
    pub event_capacity: usize,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            request_timeout_ms: 10_000,
            event_capacity: 256,
        }
    }
}

/// Hosted backend REST client
pub struct SupabaseBackend {
    client: Client,
    config: SupabaseConfig,
    events: broadcast::Sender<AuthEvent>,
}

impl SupabaseBackend {
    /// Create a new client with the given configuration
    pub fn new(config: SupabaseConfig) -> BackendResult<Self> {
        if config.url.trim().is_empty() {
            return Err(BackendError::Config("backend url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| BackendError::Config(format!("failed to create HTTP client: {}", e)))?;

        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Ok(Self {
            client,
            config,
            events,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url(), path)
    }

    /// Attach the project key and, when given, the user's bearer token
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.config.anon_key);
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        request.send().await.map_err(BackendError::from_transport)
    }

    /// Run a table select with the user's token and decode the rows
    async fn select<T: DeserializeOwned>(
        &self,
        session: &Session,
        query: &TableQuery,
    ) -> BackendResult<Vec<T>> {
        let request = self.authorize(
            self.client.get(query.url(self.base_url())),
            Some(&session.access_token),
        );
        let response = self.send(request).await?;

        match response.status() {
            status if status.is_success() => {
                let rows = response.json::<Vec<T>>().await.map_err(BackendError::from_transport)?;
                tracing::debug!(query = %query, rows = rows.len(), "Fetched rows");
                Ok(rows)
            }
            StatusCode::UNAUTHORIZED => Err(BackendError::SessionExpired),
            _ => Err(api_error(response).await),
        }
    }

    /// Decode a token-grant response into a session and announce it
    async fn session_from_grant(
        &self,
        response: Response,
        announce: fn(Uuid) -> AuthEvent,
    ) -> BackendResult<Session> {
        match response.status() {
            status if status.is_success() => {
                let grant: TokenGrant =
                    response.json().await.map_err(BackendError::from_transport)?;
                let session = grant.into_session();
                let _ = self.events.send(announce(session.user_id()));
                Ok(session)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(BackendError::InvalidCredentials)
            }
            _ => Err(api_error(response).await),
        }
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session> {
        let request = self.authorize(
            self.client
                .post(self.auth_url("token"))
                .query(&[("grant_type", "password")])
                .json(credentials),
            None,
        );
        let response = self.send(request).await?;
        let session = self.session_from_grant(response, AuthEvent::signed_in).await?;

        tracing::info!(user_id = %session.user_id(), "Signed in");
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUp) -> BackendResult<Option<Session>> {
        let body = SignUpBody {
            email: &request.email,
            password: &request.password,
            data: SignUpData {
                full_name: request.full_name.as_deref(),
            },
        };
        let http = self.authorize(self.client.post(self.auth_url("signup")).json(&body), None);
        let response = self.send(http).await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        // With e-mail confirmation enabled the body is the bare user object.
        let value: serde_json::Value =
            response.json().await.map_err(BackendError::from_transport)?;
        if value.get("access_token").is_none() {
            tracing::info!(email = %request.email, "Signed up, confirmation pending");
            return Ok(None);
        }

        let grant: TokenGrant = serde_json::from_value(value)?;
        let session = grant.into_session();
        let _ = self.events.send(AuthEvent::signed_in(session.user_id()));

        tracing::info!(user_id = %session.user_id(), "Signed up");
        Ok(Some(session))
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        let request = self.authorize(
            self.client
                .post(self.auth_url("token"))
                .query(&[("grant_type", "refresh_token")])
                .json(&RefreshBody { refresh_token }),
            None,
        );
        let response = self.send(request).await?;

        self.session_from_grant(response, AuthEvent::token_refreshed)
            .await
            .map_err(|e| match e {
                BackendError::InvalidCredentials => BackendError::SessionExpired,
                other => other,
            })
    }

    async fn get_session(&self, access_token: &str) -> BackendResult<Option<Session>> {
        let request = self.authorize(self.client.get(self.auth_url("user")), Some(access_token));
        let response = self.send(request).await?;

        match response.status() {
            status if status.is_success() => {
                let user: AuthUser = response.json().await.map_err(BackendError::from_transport)?;
                Ok(Some(Session {
                    access_token: access_token.to_string(),
                    refresh_token: None,
                    expires_at: None,
                    user,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(api_error(response).await),
        }
    }

    async fn sign_out(&self, session: &Session) -> BackendResult<()> {
        let request = self.authorize(
            self.client.post(self.auth_url("logout")),
            Some(&session.access_token),
        );
        let response = self.send(request).await?;

        // An already revoked token is as signed out as it gets.
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            let _ = self.events.send(AuthEvent::signed_out(session.user_id()));
            tracing::info!(user_id = %session.user_id(), "Signed out");
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, session: &Session) -> BackendResult<Option<Profile>> {
        let query = TableQuery::select("profiles")
            .eq("id", session.user_id())
            .limit(1);
        let rows: Vec<Profile> = self.select(session, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_locations(&self, session: &Session) -> BackendResult<Vec<CampusLocation>> {
        let query = TableQuery::select("campus_map").order("name", Direction::Asc);
        self.select(session, &query).await
    }

    async fn list_services(
        &self,
        session: &Session,
        filter: &ServiceFilter,
    ) -> BackendResult<Vec<Service>> {
        let mut query = TableQuery::select("services").order("name", Direction::Asc);
        if let Some(service_type) = filter.service_type {
            query = query.eq("type", service_type);
        }
        if filter.approved_only {
            query = query.eq("approved", true);
        }
        self.select(session, &query).await
    }

    async fn list_reviews(
        &self,
        session: &Session,
        service_id: Option<Uuid>,
    ) -> BackendResult<Vec<Review>> {
        let mut query = TableQuery::select("reviews").order("created_at", Direction::Desc);
        if let Some(id) = service_id {
            query = query.eq("service_id", id);
        }
        self.select(session, &query).await
    }

    async fn health_check(&self) -> BackendResult<()> {
        let request = self.authorize(self.client.get(self.auth_url("health")), None);
        let response = self.send(request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }
}

async fn api_error(response: Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or(text);

    tracing::warn!(status = status.as_u16(), message = %message, "Backend returned an error");

    BackendError::ApiError {
        status: status.as_u16(),
        message,
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpData<'a>,
}

#[derive(Debug, Serialize)]
struct SignUpData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenGrant {
    fn into_session(self) -> Session {
        let expires_at = self.expires_at.or_else(|| {
            self.expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs)
        });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// The auth and REST halves report errors under different keys
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SupabaseConfig::default();
        assert_eq!(config.url, "http://localhost:54321");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = SupabaseConfig {
            url: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SupabaseBackend::new(config),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn test_auth_url_trims_trailing_slash() {
        let backend = SupabaseBackend::new(SupabaseConfig {
            url: "https://demo.supabase.co/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.auth_url("user"), "https://demo.supabase.co/auth/v1/user");
    }

    #[test]
    fn test_token_grant_expires_in() {
        let json = r#"{
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "def",
            "user": {"id": "6f1c7a5e-0d7b-4c55-9d6f-2a3e9b7c1d10", "email": "a@b.c"}
        }"#;
        let grant: TokenGrant = serde_json::from_str(json).unwrap();
        let now = chrono::Utc::now().timestamp();
        let session = grant.into_session();
        assert_eq!(session.access_token, "abc");
        assert_eq!(session.refresh_token.as_deref(), Some("def"));
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at >= now + 3599 && expires_at <= now + 3601);
    }

    #[test]
    fn test_error_body_message_keys() {
        let auth: ErrorBody =
            serde_json::from_str(r#"{"error_description": "Invalid login"}"#).unwrap();
        assert_eq!(auth.into_message().as_deref(), Some("Invalid login"));

        let rest: ErrorBody =
            serde_json::from_str(r#"{"message": "column does not exist"}"#).unwrap();
        assert_eq!(rest.into_message().as_deref(), Some("column does not exist"));
    }

    const USER_ID: &str = "6f1c7a5e-0d7b-4c55-9d6f-2a3e9b7c1d10";

    /// Serve a stand-in for the hosted project on a random local port
    async fn stub_backend(router: axum::Router) -> SupabaseBackend {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        SupabaseBackend::new(SupabaseConfig {
            url: format!("http://{}", addr),
            anon_key: "anon".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn stub_session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: Uuid::parse_str(USER_ID).unwrap(),
                email: Some("a@collo.dev".to_string()),
                user_metadata: serde_json::json!({}),
            },
        }
    }

    fn stub_user() -> serde_json::Value {
        serde_json::json!({ "id": USER_ID, "email": "a@collo.dev" })
    }

    #[tokio::test]
    async fn test_select_unauthorized_is_session_expired() {
        use axum::{http::StatusCode, routing::get, Json};

        let router = axum::Router::new().route(
            "/rest/v1/campus_map",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "message": "JWT expired" })),
                )
            }),
        );
        let backend = stub_backend(router).await;

        let result = backend.list_locations(&stub_session("stale")).await;
        assert!(matches!(result, Err(BackendError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_select_decodes_rows() {
        use axum::{routing::get, Json};

        let router = axum::Router::new().route(
            "/rest/v1/campus_map",
            get(|| async {
                Json(serde_json::json!([{
                    "id": "0b8e0f4c-3f7a-4d0c-9a61-5f0e2d9b8c11",
                    "name": "Central Library",
                    "type": "library",
                    "building": "Block A",
                    "floor": 1
                }]))
            }),
        );
        let backend = stub_backend(router).await;

        let rows = backend.list_locations(&stub_session("live")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Central Library");
    }

    #[tokio::test]
    async fn test_get_session_rejected_token_is_none() {
        use axum::{
            http::{HeaderMap, StatusCode},
            response::IntoResponse,
            routing::get,
            Json,
        };

        async fn user(headers: HeaderMap) -> axum::response::Response {
            let bearer = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            match bearer {
                "Bearer revoked" => StatusCode::UNAUTHORIZED.into_response(),
                "Bearer banned" => StatusCode::FORBIDDEN.into_response(),
                _ => Json(stub_user()).into_response(),
            }
        }

        let backend = stub_backend(axum::Router::new().route("/auth/v1/user", get(user))).await;

        assert!(backend.get_session("revoked").await.unwrap().is_none());
        assert!(backend.get_session("banned").await.unwrap().is_none());

        let live = backend.get_session("live").await.unwrap().unwrap();
        assert_eq!(live.access_token, "live");
        assert_eq!(live.user_id().to_string(), USER_ID);
    }

    #[tokio::test]
    async fn test_sign_up_without_token_awaits_confirmation() {
        use axum::{routing::post, Json};

        let router = axum::Router::new()
            .route("/auth/v1/signup", post(|| async { Json(stub_user()) }));
        let backend = stub_backend(router).await;
        let mut events = backend.subscribe();

        let request = SignUp {
            email: "a@collo.dev".to_string(),
            password: "secret1".to_string(),
            full_name: None,
        };
        assert!(backend.sign_up(&request).await.unwrap().is_none());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sign_out_revoked_token_succeeds() {
        use axum::{http::StatusCode, routing::post};

        let router = axum::Router::new()
            .route("/auth/v1/logout", post(|| async { StatusCode::UNAUTHORIZED }));
        let backend = stub_backend(router).await;
        let mut events = backend.subscribe();

        backend.sign_out(&stub_session("revoked")).await.unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            AuthEvent::signed_out(Uuid::parse_str(USER_ID).unwrap())
        );
    }

    #[tokio::test]
    async fn test_rejected_grant_is_invalid_credentials() {
        use axum::{http::StatusCode, routing::post, Json};

        let router = axum::Router::new().route(
            "/auth/v1/token",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error_description": "Invalid login credentials" })),
                )
            }),
        );
        let backend = stub_backend(router).await;

        let credentials = Credentials {
            email: "a@collo.dev".to_string(),
            password: "wrong".to_string(),
        };
        assert!(matches!(
            backend.sign_in(&credentials).await,
            Err(BackendError::InvalidCredentials)
        ));
        assert!(matches!(
            backend.refresh_session("used").await,
            Err(BackendError::SessionExpired)
        ));
    }
}
