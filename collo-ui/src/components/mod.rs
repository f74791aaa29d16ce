//! UI Components
//!
//! Reusable Leptos components shared by the portal pages.

pub mod header;
pub mod loading;
pub mod service_card;
pub mod sidebar;
pub mod toast;
pub mod user_stats;

pub use header::ColloHeader;
pub use loading::CardSkeleton;
pub use service_card::ServiceCard;
pub use sidebar::Sidebar;
pub use toast::Toast;
pub use user_stats::UserStats;
