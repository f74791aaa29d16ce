//! Campus Map Routes
//!
//! - GET /api/v1/locations - Every campus map entry, ordered by name
//!
//! Searching happens in the browser over this list.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::LocationListResponse;
use crate::api::error::ApiResult;
use crate::api::state::{AppState, CurrentSession};

/// GET /api/v1/locations
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<LocationListResponse>> {
    let locations = state.backend.list_locations(&session).await?;

    Ok(Json(LocationListResponse {
        total: locations.len(),
        locations,
    }))
}
