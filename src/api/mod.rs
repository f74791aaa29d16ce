//! Collo REST API
//!
//! HTTP layer between the portal in the browser and the hosted backend,
//! built with Axum.
//!
//! # Endpoints
//!
//! ## Session
//! - `GET /api/v1/session` - Current session, if any
//! - `POST /api/v1/auth/sign-in` - Sign in with e-mail and password
//! - `POST /api/v1/auth/sign-up` - Register an account
//! - `POST /api/v1/auth/refresh` - Refresh a session
//! - `POST /api/v1/auth/sign-out` - Sign out, answers with the redirect
//!
//! ## Data (session required)
//! - `GET /api/v1/profile` - Caller's profile row and display values
//! - `GET /api/v1/locations` - Campus map entries ordered by name
//! - `GET /api/v1/services` - Service listings
//! - `GET /api/v1/reviews` - Reviews
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws?token=` - Session-change notifications
//!
//! Requests to protected endpoints without a live session answer 401 with
//! code `SESSION_REQUIRED` and `"redirect": "/auth"`.
//!
//! # Example
//!
//! ```rust,ignore
//! use collo::api::{serve, AppState};
//! use collo::backend::MemoryBackend;
//! use collo::config::ApiConfig;
//! use collo::websocket::HubConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(MemoryBackend::with_demo_data().await);
//!     let state = AppState::new(backend, ApiConfig::default(), HubConfig::default());
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, CurrentSession, MaybeSession};

use axum::{
    handler::Handler,
    body::Body,
    http::{HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Session routes
        .route("/session", get(routes::auth::current_session))
        .route("/auth/sign-in", post(routes::auth::sign_in))
        .route("/auth/sign-up", post(routes::auth::sign_up))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/sign-out", post(routes::auth::sign_out))
        // Data routes
        .route("/profile", get(routes::profile::get_profile))
        .route("/locations", get(routes::locations::list_locations))
        .route("/services", get(routes::services::list_services))
        .route("/reviews", get(routes::reviews::list_reviews))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));
    let static_dir = state.config.static_dir.clone();

    let shared_state = Arc::new(state);

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes);

    let router = match static_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Serving UI bundle");
            let spa = routes::spa::spa_index.with_state(Arc::clone(&shared_state));
            router.fallback_service(ServeDir::new(dir).fallback(spa))
        }
        None => router.fallback(routes::spa::api_not_found),
    };

    router
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .with_state(shared_state)
}

/// Request span with method and path only; the query can carry the socket token
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// CORS for the configured origins; any origin when none are listed
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Collo API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Collo API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
