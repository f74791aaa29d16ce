//! Static page content
//!
//! Hard-coded cards and copy for the dashboard and the reviews placeholder.
//! None of it comes from the backend.

use serde::Serialize;

use crate::backend::types::LocationType;

/// A service card on the dashboard grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceCardContent {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub icon_color: &'static str,
    pub rating: Option<f64>,
    pub location: Option<&'static str>,
}

pub const DASHBOARD_SERVICES: &[ServiceCardContent] = &[
    ServiceCardContent {
        title: "Student Hostels",
        description: "Find verified hostels near your campus with great amenities",
        icon: "🏠",
        icon_color: "bg-collo-orange",
        rating: Some(4.5),
        location: None,
    },
    ServiceCardContent {
        title: "Mess Services",
        description: "Delicious and affordable meal plans for students",
        icon: "🍽️",
        icon_color: "bg-collo-green",
        rating: Some(4.8),
        location: None,
    },
    ServiceCardContent {
        title: "Private Tutors",
        description: "Expert tutors for all subjects and competitive exams",
        icon: "📚",
        icon_color: "bg-collo-purple",
        rating: Some(4.7),
        location: None,
    },
    ServiceCardContent {
        title: "Transport",
        description: "Safe and reliable transport options for daily commute",
        icon: "🚗",
        icon_color: "bg-collo-blue",
        rating: Some(4.6),
        location: None,
    },
];

/// Quick-action buttons under the service grid
pub const QUICK_ACTIONS: &[&str] = &[
    "🏠 Browse Hostels",
    "🍽️ Find Mess",
    "📚 Get Tutor",
    "🚗 Book Ride",
];

/// A sample entry of the notifications panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationContent {
    pub icon: &'static str,
    pub color: &'static str,
    pub title: &'static str,
    pub detail: &'static str,
}

pub const NOTIFICATIONS: &[NotificationContent] = &[
    NotificationContent {
        icon: "✓",
        color: "bg-collo-green",
        title: "Service Approved",
        detail: "Your hostel listing is live",
    },
    NotificationContent {
        icon: "⭐",
        color: "bg-collo-blue",
        title: "New Review",
        detail: "You got a 5-star rating!",
    },
];

const TRENDING_NAMES: &[&str] = &["Sunrise Hostel", "College Mess", "IIT Tutor"];

/// Trending list: name and a rating rising by a tenth per rank
pub fn trending() -> Vec<(&'static str, String)> {
    TRENDING_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, format!("{:.1}", 4.5 + i as f64 * 0.1)))
        .collect()
}

/// Title/subtitle pair of the gradient page header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderContent {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub show_explore: bool,
}

pub const DASHBOARD_HEADER: HeaderContent = HeaderContent {
    title: "Discover Student Services",
    subtitle: "🎓 Welcome to Your Student Hub",
    show_explore: true,
};

pub const MAP_HEADER: HeaderContent = HeaderContent {
    title: "College Campus Map",
    subtitle: "🗺️ Navigate Your Campus",
    show_explore: false,
};

pub const REVIEWS_HEADER: HeaderContent = HeaderContent {
    title: "Reviews & Ratings",
    subtitle: "⭐ Share Your Experience",
    show_explore: false,
};

pub const PROFILE_HEADER: HeaderContent = HeaderContent {
    title: "My Profile",
    subtitle: "👤 Manage Your Account",
    show_explore: false,
};

/// Copy of the reviews placeholder card
pub const REVIEWS_PLACEHOLDER_TITLE: &str = "Reviews Coming Soon";
pub const REVIEWS_PLACEHOLDER_TEXT: &str = "Rate and review services to help other students";

pub const MAP_SEARCH_PLACEHOLDER: &str = "Search for rooms, buildings, facilities...";
pub const DIRECTIONS_COMING_SOON: &str = "Directions feature coming soon!";
pub const LOCATIONS_LOAD_FAILED: &str = "Failed to load locations";
pub const LOGGED_OUT: &str = "Logged out successfully";

/// Badge colour class for a location type
pub fn location_badge_class(location_type: LocationType) -> &'static str {
    match location_type {
        LocationType::Classroom => "bg-collo-blue",
        LocationType::Lab => "bg-collo-purple",
        LocationType::Office => "bg-collo-gray",
        LocationType::Hostel => "bg-collo-orange",
        LocationType::Canteen => "bg-collo-green",
        LocationType::Library => "bg-[#8b5cf6]",
        LocationType::Auditorium => "bg-collo-red",
        LocationType::Sports => "bg-[#10b981]",
        LocationType::Parking => "bg-[#6b7280]",
        LocationType::Department => "bg-collo-blue",
        LocationType::Other => "bg-muted",
    }
}
