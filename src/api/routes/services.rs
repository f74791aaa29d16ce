//! Service Listing Routes
//!
//! - GET /api/v1/services?type=&approved= - Read-only service listings

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ServiceListResponse, ServiceParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::{AppState, CurrentSession};
use crate::backend::{ServiceFilter, ServiceType};

/// GET /api/v1/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<ServiceParams>,
) -> ApiResult<Json<ServiceListResponse>> {
    let filter = parse_filter(&params)?;
    let services = state.backend.list_services(&session, &filter).await?;

    Ok(Json(ServiceListResponse {
        total: services.len(),
        services,
    }))
}

fn parse_filter(params: &ServiceParams) -> ApiResult<ServiceFilter> {
    let service_type = params
        .service_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().parse::<ServiceType>())
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    Ok(ServiceFilter {
        service_type,
        approved_only: params.approved.unwrap_or(false),
    })
}
