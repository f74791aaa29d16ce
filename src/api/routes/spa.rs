//! Single-page app hosting
//!
//! Built UI assets are served from `api.static_dir`. Any path that is not a
//! file gets `index.html` so the browser router can take over, with 404 for
//! paths the router will render as "not found".

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Html,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::portal::Page;

/// Fallback for paths that match no asset
pub async fn spa_index(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> ApiResult<(StatusCode, Html<String>)> {
    let dir = state
        .config
        .static_dir
        .as_ref()
        .ok_or_else(|| ApiError::NotFound(uri.path().to_string()))?;

    let index = tokio::fs::read_to_string(dir.join("index.html")).await?;
    Ok((status_for(uri.path()), Html(index)))
}

/// Fallback when no UI bundle is configured
pub async fn api_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

fn status_for(path: &str) -> StatusCode {
    match Page::resolve(path) {
        Page::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    }
}
