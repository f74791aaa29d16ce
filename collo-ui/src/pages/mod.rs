//! Pages
//!
//! Top-level page components for each route.

pub mod auth;
pub mod college_map;
pub mod dashboard;
pub mod profile;
pub mod reviews;

pub use auth::Auth;
pub use college_map::CollegeMap;
pub use dashboard::Dashboard;
pub use profile::Profile;
pub use reviews::Reviews;

use leptos::*;

use crate::api::{self, ClientError};
use crate::state::GlobalState;

/// Load the caller's profile into global state
///
/// A missing row already arrives as placeholder values; other failures
/// leave the previous values in place.
pub(crate) fn load_profile(state: GlobalState, on_session_lost: Callback<()>) {
    spawn_local(async move {
        match api::fetch_profile().await {
            Ok(response) => state.profile.set(response.summary),
            Err(ClientError::SessionRequired) => on_session_lost.call(()),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch profile: {}", e).into());
            }
        }
    });
}
