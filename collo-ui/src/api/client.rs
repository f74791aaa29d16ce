//! HTTP API Client
//!
//! Functions for communicating with the Collo REST API. Every data call
//! carries the stored access token as a bearer header.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use collo::portal::ProfileSummary;
use collo::{CampusLocation, Profile, Session};

use super::session_store::{clear_session, load_session, session_due_for_refresh, store_session};

/// API base URL when the page origin is unknown
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";

const API_URL_KEY: &str = "collo_api_url";

/// Get the API base URL from local storage, else the page origin
pub fn get_api_base() -> String {
    let window = web_sys::window();

    let stored = window
        .as_ref()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten());

    let url = stored.unwrap_or_else(|| {
        window
            .and_then(|w| w.location().origin().ok())
            .map(|origin| format!("{}/api/v1", origin))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    });
    url.trim_end_matches('/').to_string()
}

/// WebSocket endpoint for an API base URL
pub fn ws_url(api_base: &str, token: &str) -> String {
    let base = api_base
        .replacen("https://", "wss://", 1)
        .replacen("http://", "ws://", 1);
    let token: String = js_sys::encode_uri_component(token).into();
    format!("{}/ws?token={}", base, token)
}

// ============ Errors ============

/// Why a call failed
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No session, or the API no longer accepts it
    SessionRequired,
    /// Anything else, as a message fit for a toast
    Message(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::SessionRequired => write!(f, "Please sign in to continue"),
            ClientError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Turn an error response into a `ClientError`
fn classify_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if env.redirect.is_some() || env.error.code == "SESSION_REQUIRED" => {
            ClientError::SessionRequired
        }
        Ok(env) => ClientError::Message(env.error.message),
        Err(_) if status == 401 => ClientError::SessionRequired,
        Err(_) => ClientError::Message(format!("Request failed ({})", status)),
    }
}

// ============ Response Types ============

#[derive(Debug, serde::Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub session: Option<Session>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SignUpResponse {
    pub session: Option<Session>,
    pub confirmation_required: bool,
}

#[derive(Debug, serde::Deserialize)]
pub struct SignOutResponse {
    pub redirect: String,
    pub message: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
    pub summary: ProfileSummary,
}

#[derive(Debug, serde::Deserialize)]
struct LocationListResponse {
    locations: Vec<CampusLocation>,
}

// ============ Plumbing ============

fn with_auth(builder: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
    match session {
        Some(s) => builder.header("Authorization", &format!("Bearer {}", s.access_token)),
        None => builder,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::Message(format!("Parse error: {}", e)))
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::Message(format!("Network error: {}", e))
}

fn stored_session() -> Result<Session, ClientError> {
    load_session().ok_or(ClientError::SessionRequired)
}

// ============ API Functions ============

/// Ask the API whether the stored session is still live
pub async fn fetch_session() -> Result<Option<Session>, ClientError> {
    let Some(session) = load_session() else {
        return Ok(None);
    };

    let response = with_auth(Request::get(&format!("{}/session", get_api_base())), Some(&session))
        .send()
        .await
        .map_err(network)?;

    let result: SessionResponse = read_json(response).await?;
    Ok(result.session.filter(|_| result.authenticated))
}

/// Sign in with e-mail and password
pub async fn sign_in(email: &str, password: &str) -> Result<Session, ClientError> {
    #[derive(serde::Serialize)]
    struct SignInRequest<'a> {
        email: &'a str,
        password: &'a str,
    }

    let response = Request::post(&format!("{}/auth/sign-in", get_api_base()))
        .json(&SignInRequest { email, password })
        .map_err(|e| ClientError::Message(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Trade a refresh token for a new session
pub async fn refresh_session(refresh_token: &str) -> Result<Session, ClientError> {
    #[derive(serde::Serialize)]
    struct RefreshRequest<'a> {
        refresh_token: &'a str,
    }

    let response = Request::post(&format!("{}/auth/refresh", get_api_base()))
        .json(&RefreshRequest { refresh_token })
        .map_err(|e| ClientError::Message(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Renew the stored session when its token is expired or close to it
///
/// Returns the new session, or `None` when nothing was due. A rejected
/// refresh token clears the stored session.
pub async fn renew_session_if_due() -> Result<Option<Session>, ClientError> {
    let Some(refresh_token) = session_due_for_refresh().and_then(|s| s.refresh_token) else {
        return Ok(None);
    };

    match refresh_session(&refresh_token).await {
        Ok(session) => {
            store_session(&session);
            Ok(Some(session))
        }
        Err(ClientError::SessionRequired) => {
            clear_session();
            Err(ClientError::SessionRequired)
        }
        Err(e) => Err(e),
    }
}

/// Register an account
pub async fn sign_up(
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<SignUpResponse, ClientError> {
    #[derive(serde::Serialize)]
    struct SignUpRequest<'a> {
        email: &'a str,
        password: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        full_name: Option<&'a str>,
    }

    let response = Request::post(&format!("{}/auth/sign-up", get_api_base()))
        .json(&SignUpRequest {
            email,
            password,
            full_name,
        })
        .map_err(|e| ClientError::Message(format!("Request build error: {}", e)))?
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Sign out; the API answers with where to go next
pub async fn sign_out() -> Result<SignOutResponse, ClientError> {
    let session = load_session();

    let response = with_auth(
        Request::post(&format!("{}/auth/sign-out", get_api_base())),
        session.as_ref(),
    )
    .send()
    .await
    .map_err(network)?;

    read_json(response).await
}

/// Fetch the caller's profile row and display values
pub async fn fetch_profile() -> Result<ProfileResponse, ClientError> {
    let session = stored_session()?;

    let response = with_auth(Request::get(&format!("{}/profile", get_api_base())), Some(&session))
        .send()
        .await
        .map_err(network)?;

    read_json(response).await
}

/// Fetch every campus location, ordered by name
pub async fn fetch_locations() -> Result<Vec<CampusLocation>, ClientError> {
    let session = stored_session()?;

    let response = with_auth(Request::get(&format!("{}/locations", get_api_base())), Some(&session))
        .send()
        .await
        .map_err(network)?;

    let result: LocationListResponse = read_json(response).await?;
    Ok(result.locations)
}
