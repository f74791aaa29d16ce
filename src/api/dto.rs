//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Row types from the backend are serialized as-is.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{CampusLocation, Profile, Review, Service, Session};
use crate::portal::ProfileSummary;

// ============================================
// SESSION / AUTH DTOs
// ============================================

/// Current session check
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Whether a valid session was presented
    pub authenticated: bool,
    /// The resolved session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

/// Sign-up response
#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    /// Session, unless e-mail confirmation is pending
    pub session: Option<Session>,
    /// True when the account exists but cannot sign in yet
    pub confirmation_required: bool,
}

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Sign-out response
#[derive(Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    /// Page to navigate to
    pub redirect: String,
    /// Confirmation toast
    pub message: String,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Profile row plus the values the widgets show
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Raw row; null when the user has none
    pub profile: Option<Profile>,
    /// Display values with placeholders applied
    pub summary: ProfileSummary,
}

// ============================================
// LISTING DTOs
// ============================================

/// Campus map listing
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationListResponse {
    pub locations: Vec<CampusLocation>,
    pub total: usize,
}

/// Service listing parameters
#[derive(Debug, Default, Deserialize)]
pub struct ServiceParams {
    /// Restrict to one service type (hostel, mess, tutor, transport, pets)
    #[serde(default, rename = "type")]
    pub service_type: Option<String>,
    /// Only approved listings
    #[serde(default)]
    pub approved: Option<bool>,
}

/// Service listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
    pub total: usize,
}

/// Review listing parameters
#[derive(Debug, Default, Deserialize)]
pub struct ReviewParams {
    #[serde(default)]
    pub service_id: Option<Uuid>,
}

/// Review listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Hosted backend status
    pub backend: String,
    /// Open session-change sockets
    pub websocket_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
