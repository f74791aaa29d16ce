//! Profile Routes
//!
//! - GET /api/v1/profile - The caller's profile row and display values

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::ProfileResponse;
use crate::api::error::ApiResult;
use crate::api::state::{AppState, CurrentSession};
use crate::portal::ProfileSummary;

/// GET /api/v1/profile
///
/// A user without a row gets `profile: null` and the placeholder summary.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.backend.fetch_profile(&session).await?;
    if profile.is_none() {
        tracing::debug!(user_id = %session.user_id(), "No profile row, using defaults");
    }

    Ok(Json(ProfileResponse {
        summary: ProfileSummary::from_row(profile.as_ref()),
        profile,
    }))
}
