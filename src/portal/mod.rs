//! Portal Logic
//!
//! Page-level behaviour shared by the browser bundle and the host server:
//!
//! - **routes**: Path-to-page table and sidebar entries
//! - **search**: Client-side campus map filtering
//! - **profile**: Profile row to display values, with placeholders
//! - **catalog**: Static dashboard and placeholder content
//! - **gate**: Session gate over the backend (server only)

pub mod catalog;
pub mod profile;
pub mod routes;
pub mod search;

#[cfg(feature = "server")]
pub mod gate;

pub use profile::ProfileSummary;
pub use routes::{active_nav_item, NavItem, Page, AUTH_PATH, NAV_ITEMS};
pub use search::{EmptyState, LocationSearch};

#[cfg(feature = "server")]
pub use gate::{GateOutcome, SessionGate};
