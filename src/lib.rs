//! # Collo
//!
//! Campus services portal for students: a dashboard of services (hostels,
//! mess, tutors, transport), a searchable campus map, a reviews page and a
//! profile page, all behind a session gate.
//!
//! The portal owns no data. Accounts, sessions and rows live in a hosted
//! backend-as-a-service; this crate reads from it on demand.
//!
//! ## Modules
//!
//! - [`backend`]: Row types and the hosted backend client
//! - [`portal`]: Routing, search, profile defaults and the session gate
//! - [`api`]: REST API server with Axum (feature `server`)
//! - [`websocket`]: Session-change push (feature `server`)
//! - [`config`]: TOML + environment configuration (feature `server`)
//!
//! Without the `server` feature only the types and the pure portal logic are
//! compiled, which is what the browser bundle links against.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collo::backend::{Backend, Credentials, MemoryBackend};
//! use collo::portal::{LocationSearch, ProfileSummary};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MemoryBackend::with_demo_data().await;
//!     let session = backend
//!         .sign_in(&Credentials {
//!             email: "student@collo.dev".into(),
//!             password: "collo-demo".into(),
//!         })
//!         .await?;
//!
//!     let profile = backend.fetch_profile(&session).await?;
//!     println!("Hello {}", ProfileSummary::from_row(profile.as_ref()).display_name);
//!
//!     let locations = backend.list_locations(&session).await?;
//!     for location in LocationSearch::new("lab").apply(&locations) {
//!         println!("{}", location.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod portal;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod websocket;

// Re-export top-level types for convenience
pub use backend::{
    AuthEvent, AuthEventKind, AuthUser, CampusLocation, LocationType, Profile, Review, Service,
    ServiceType, Session,
};

pub use portal::{LocationSearch, NavItem, Page, ProfileSummary, NAV_ITEMS};

#[cfg(feature = "server")]
pub use backend::{Backend, BackendError, BackendResult, MemoryBackend, SupabaseBackend};

#[cfg(feature = "server")]
pub use portal::{GateOutcome, SessionGate};

#[cfg(feature = "server")]
pub use api::{build_router, serve, ApiError, AppState};

#[cfg(feature = "server")]
pub use config::{Config, ConfigError};

#[cfg(feature = "server")]
pub use websocket::{HubConfig, SessionHub};
