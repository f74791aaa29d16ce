//! Profile display values
//!
//! A missing profile row is not an error: every field falls back to a
//! placeholder so the dashboard sidebar and the profile page still render.

use serde::{Deserialize, Serialize};

use crate::backend::types::Profile;

pub const DEFAULT_DISPLAY_NAME: &str = "Student";

/// What the stats widgets show for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub display_name: String,
    pub initial: String,
    pub avatar_url: Option<String>,
    pub points: i64,
    pub reviews: i64,
    pub streak: i64,
}

impl Default for ProfileSummary {
    fn default() -> Self {
        Self::from_row(None)
    }
}

impl ProfileSummary {
    pub fn from_row(profile: Option<&Profile>) -> Self {
        let display_name = profile
            .and_then(|p| p.full_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
            .to_string();

        Self {
            initial: initial_of(&display_name),
            display_name,
            avatar_url: profile.and_then(|p| p.avatar_url.clone()),
            points: profile.and_then(|p| p.points).unwrap_or(0),
            reviews: profile.and_then(|p| p.reviews_count).unwrap_or(0),
            streak: profile.and_then(|p| p.streak_days).unwrap_or(0),
        }
    }
}

/// Upper-cased first character of a name
pub fn initial_of(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "S".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_missing_row_defaults() {
        let summary = ProfileSummary::from_row(None);
        assert_eq!(summary.display_name, "Student");
        assert_eq!(summary.initial, "S");
        assert_eq!(summary.points, 0);
        assert_eq!(summary.reviews, 0);
        assert_eq!(summary.streak, 0);
    }

    #[test]
    fn test_row_with_null_columns() {
        let profile = Profile::new(Uuid::nil());
        assert_eq!(ProfileSummary::from_row(Some(&profile)), ProfileSummary::default());
    }

    #[test]
    fn test_full_row() {
        let profile = Profile::new(Uuid::nil()).full_name("meera iyer").counters(250, 7, 12);
        let summary = ProfileSummary::from_row(Some(&profile));
        assert_eq!(summary.display_name, "meera iyer");
        assert_eq!(summary.initial, "M");
        assert_eq!(summary.points, 250);
        assert_eq!(summary.reviews, 7);
        assert_eq!(summary.streak, 12);
    }

    #[test]
    fn test_blank_name_falls_back() {
        let profile = Profile::new(Uuid::nil()).full_name("  ");
        assert_eq!(ProfileSummary::from_row(Some(&profile)).initial, "S");
    }

    #[test]
    fn test_initial_of_non_ascii() {
        assert_eq!(initial_of("élodie"), "É");
        assert_eq!(initial_of(""), "S");
    }
}
