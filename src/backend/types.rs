//! Row types mirrored from the hosted store
//!
//! These are transient copies of rows owned by the hosted backend:
//! - `Profile`: per-user gamification counters
//! - `Service`: a listed student service (hostel, mess, tutor, ...)
//! - `Review`: a rating left on a service
//! - `CampusLocation`: an entry of the campus map directory
//! - `Session` / `AuthUser`: the authenticated user context
//!
//! Nullable columns are `Option`s; the portal never writes any of them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Row of the `profiles` table, keyed by the auth user id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub reviews_count: Option<i64>,
    #[serde(default)]
    pub streak_days: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Create an empty profile row for a user
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            full_name: None,
            avatar_url: None,
            points: None,
            reviews_count: None,
            streak_days: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder method: set the display name
    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Builder method: set points, review count and streak
    pub fn counters(mut self, points: i64, reviews: i64, streak: i64) -> Self {
        self.points = Some(points);
        self.reviews_count = Some(reviews);
        self.streak_days = Some(streak);
        self
    }
}

/// Category of a listed service (`service_type` enum in the store)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Hostel,
    Mess,
    Tutor,
    Transport,
    Pets,
    Stationary,
    Laundry,
    Other,
}

impl ServiceType {
    /// Get all service types for iteration
    pub fn all() -> &'static [ServiceType] {
        &[
            ServiceType::Hostel,
            ServiceType::Mess,
            ServiceType::Tutor,
            ServiceType::Transport,
            ServiceType::Pets,
            ServiceType::Stationary,
            ServiceType::Laundry,
            ServiceType::Other,
        ]
    }

    /// Wire string used by the store
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Hostel => "hostel",
            ServiceType::Mess => "mess",
            ServiceType::Tutor => "tutor",
            ServiceType::Transport => "transport",
            ServiceType::Pets => "pets",
            ServiceType::Stationary => "stationary",
            ServiceType::Laundry => "laundry",
            ServiceType::Other => "other",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                domain: "service_type",
                value: s.to_string(),
            })
    }
}

/// Category of a campus map entry (`location_type` enum in the store)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Classroom,
    Lab,
    Office,
    Hostel,
    Canteen,
    Library,
    Auditorium,
    Sports,
    Parking,
    Department,
    Other,
}

impl LocationType {
    /// Get all location types for iteration
    pub fn all() -> &'static [LocationType] {
        &[
            LocationType::Classroom,
            LocationType::Lab,
            LocationType::Office,
            LocationType::Hostel,
            LocationType::Canteen,
            LocationType::Library,
            LocationType::Auditorium,
            LocationType::Sports,
            LocationType::Parking,
            LocationType::Department,
            LocationType::Other,
        ]
    }

    /// Wire string used by the store
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Classroom => "classroom",
            LocationType::Lab => "lab",
            LocationType::Office => "office",
            LocationType::Hostel => "hostel",
            LocationType::Canteen => "canteen",
            LocationType::Library => "library",
            LocationType::Auditorium => "auditorium",
            LocationType::Sports => "sports",
            LocationType::Parking => "parking",
            LocationType::Department => "department",
            LocationType::Other => "other",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                domain: "location_type",
                value: s.to_string(),
            })
    }
}

/// A value outside one of the store's closed enum domains
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {domain}")]
pub struct UnknownVariant {
    pub domain: &'static str,
    pub value: String,
}

/// Row of the `services` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews_count: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub added_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Service {
    /// Create a service row with required fields
    pub fn new(id: Uuid, name: impl Into<String>, service_type: ServiceType) -> Self {
        Self {
            id,
            name: name.into(),
            service_type,
            description: None,
            rating: None,
            reviews_count: None,
            location: None,
            approved: None,
            price: None,
            amenities: None,
            image_url: None,
            added_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder method: set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method: set the rating
    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Builder method: set the location text
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method: set the approval flag
    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    /// A missing approval flag counts as not approved
    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
    }
}

/// Row of the `reviews` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row of the `campus_map` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampusLocation {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub added_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CampusLocation {
    /// Create a map entry with required fields
    pub fn new(id: Uuid, name: impl Into<String>, location_type: LocationType) -> Self {
        Self {
            id,
            name: name.into(),
            location_type,
            building: None,
            floor: None,
            latitude: None,
            longitude: None,
            description: None,
            added_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder method: set building and floor
    pub fn building(mut self, building: impl Into<String>, floor: Option<i32>) -> Self {
        self.building = Some(building.into());
        self.floor = floor;
        self
    }

    /// Builder method: set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method: set coordinates
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// The authenticated user as reported by the hosted auth service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Full name recorded at sign-up, if any
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

/// An authenticated user context issued by the hosted auth service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds since the Unix epoch; `None` when the issuer did not say
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Check whether the access token has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|exp| exp <= now.timestamp())
            .unwrap_or(false)
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Kind of session transition reported by the auth collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl AuthEventKind {
    /// Whether a session exists after this transition
    pub fn has_session(&self) -> bool {
        !matches!(self, AuthEventKind::SignedOut)
    }
}

/// Session-change notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub user_id: Uuid,
}

impl AuthEvent {
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            user_id,
        }
    }

    pub fn signed_out(user_id: Uuid) -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            user_id,
        }
    }

    pub fn token_refreshed(user_id: Uuid) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            user_id,
        }
    }
}
