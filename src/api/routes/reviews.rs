//! Review Routes
//!
//! - GET /api/v1/reviews?service_id= - Reviews, newest first

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ReviewListResponse, ReviewParams};
use crate::api::error::ApiResult;
use crate::api::state::{AppState, CurrentSession};

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ReviewParams>,
) -> ApiResult<Json<ReviewListResponse>> {
    let reviews = state.backend.list_reviews(&session, params.service_id).await?;

    Ok(Json(ReviewListResponse {
        total: reviews.len(),
        reviews,
    }))
}
