//! Campus map search
//!
//! The map page fetches the whole `campus_map` table once and narrows it in
//! memory as the user types. Nothing here talks to the backend.

use serde::Serialize;

use crate::backend::types::CampusLocation;

/// In-memory filter over already-fetched locations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSearch {
    query: String,
    needle: String,
}

impl LocationSearch {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.to_lowercase();
        Self { query, needle }
    }

    /// The query exactly as typed
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whitespace-only queries match everything
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Case-insensitive substring match on name, building or type
    pub fn matches(&self, location: &CampusLocation) -> bool {
        if self.is_blank() {
            return true;
        }

        location.name.to_lowercase().contains(&self.needle)
            || location
                .building
                .as_deref()
                .map(|b| b.to_lowercase().contains(&self.needle))
                .unwrap_or(false)
            || location.location_type.as_str().contains(&self.needle)
    }

    /// Filter a list, keeping its order
    pub fn apply<'a>(&self, locations: &'a [CampusLocation]) -> Vec<&'a CampusLocation> {
        locations.iter().filter(|l| self.matches(l)).collect()
    }

    /// Message to show when the filtered list is empty
    pub fn empty_state(&self) -> EmptyState {
        EmptyState {
            title: "No locations found",
            hint: if self.query.is_empty() {
                "Start by adding locations to your campus map"
            } else {
                "Try a different search term"
            },
        }
    }
}

/// Empty-state copy for the location grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

/// Badge text for the result count
pub fn count_label(count: usize) -> String {
    format!("{} locations", count)
}

/// "Building, Floor N" line of a location card
///
/// Floor zero is left out the same way a missing floor is.
pub fn location_subtitle(location: &CampusLocation) -> String {
    let building = location.building.as_deref().unwrap_or_default();
    match location.floor {
        Some(floor) if floor != 0 => format!("{}, Floor {}", building, floor),
        _ => building.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::LocationType;
    use uuid::Uuid;

    fn locations() -> Vec<CampusLocation> {
        vec![
            CampusLocation::new(Uuid::nil(), "Central Library", LocationType::Library)
                .building("Block A", Some(1)),
            CampusLocation::new(Uuid::nil(), "Physics Lab 2", LocationType::Lab)
                .building("Science Block", Some(2)),
            CampusLocation::new(Uuid::nil(), "Main Canteen", LocationType::Canteen),
        ]
    }

    fn names<'a>(found: &[&'a CampusLocation]) -> Vec<&'a str> {
        found.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let all = locations();
        assert_eq!(LocationSearch::new("").apply(&all).len(), 3);
        assert_eq!(LocationSearch::new("   ").apply(&all).len(), 3);
    }

    #[test]
    fn test_match_is_case_insensitive_on_name() {
        let all = locations();
        let found = LocationSearch::new("LIBRARY").apply(&all);
        assert_eq!(names(&found), vec!["Central Library"]);
    }

    #[test]
    fn test_match_on_building() {
        let all = locations();
        let found = LocationSearch::new("block").apply(&all);
        assert_eq!(names(&found), vec!["Central Library", "Physics Lab 2"]);
    }

    #[test]
    fn test_match_on_type() {
        let all = locations();
        let found = LocationSearch::new("canteen").apply(&all);
        assert_eq!(names(&found), vec!["Main Canteen"]);

        // "lab" hits the lab by type and nothing else by name or building
        let found = LocationSearch::new("Lab").apply(&all);
        assert_eq!(names(&found), vec!["Physics Lab 2"]);
    }

    #[test]
    fn test_no_match_yields_empty_state() {
        let all = locations();
        let search = LocationSearch::new("swimming pool");
        assert!(search.apply(&all).is_empty());
        assert_eq!(search.empty_state().title, "No locations found");
        assert_eq!(search.empty_state().hint, "Try a different search term");
    }

    #[test]
    fn test_empty_table_hint() {
        let search = LocationSearch::new("");
        assert!(search.apply(&[]).is_empty());
        assert_eq!(
            search.empty_state().hint,
            "Start by adding locations to your campus map"
        );
    }

    #[test]
    fn test_location_subtitle() {
        let all = locations();
        assert_eq!(location_subtitle(&all[0]), "Block A, Floor 1");
        assert_eq!(location_subtitle(&all[2]), "");

        let ground = CampusLocation::new(Uuid::nil(), "Lobby", LocationType::Other)
            .building("Admin Block", Some(0));
        assert_eq!(location_subtitle(&ground), "Admin Block");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 locations");
        assert_eq!(count_label(12), "12 locations");
    }
}
