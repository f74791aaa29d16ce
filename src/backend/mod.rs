//! Hosted Backend Collaborator
//!
//! The portal owns no data. Every row lives in a hosted backend-as-a-service
//! (relational store + session auth) and is fetched on demand:
//!
//! - **types**: Row mirrors and enumerated domains (compiled everywhere)
//! - **query**: PostgREST query-string builder
//! - **supabase**: `Backend` implementation over the hosted REST API
//! - **memory**: In-process `Backend` for tests and demo mode
//! - **error**: Error types
//!
//! # Contract
//!
//! ```text
//! auth:   sign_in / sign_up / refresh_session / get_session / sign_out
//! events: subscribe() -> SignedIn | SignedOut | TokenRefreshed
//! rows:   profiles (single row by user id)
//!         campus_map (all rows, ordered by name)
//!         services, reviews (read-only listings)
//! ```

pub mod types;

#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod memory;
#[cfg(feature = "server")]
pub mod query;
#[cfg(feature = "server")]
pub mod supabase;

pub use types::{
    AuthEvent, AuthEventKind, AuthUser, CampusLocation, LocationType, Profile, Review, Service,
    ServiceType, Session, UnknownVariant,
};

#[cfg(feature = "server")]
pub use error::{BackendError, BackendResult};
#[cfg(feature = "server")]
pub use memory::MemoryBackend;
#[cfg(feature = "server")]
pub use query::TableQuery;
#[cfg(feature = "server")]
pub use supabase::{SupabaseBackend, SupabaseConfig};

#[cfg(feature = "server")]
pub use contract::*;

#[cfg(feature = "server")]
mod contract {
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use tokio::sync::broadcast;
    use uuid::Uuid;

    use super::error::BackendResult;
    use super::types::{AuthEvent, CampusLocation, Profile, Review, Service, ServiceType, Session};

    /// E-mail/password sign-in request
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    /// Account registration request
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SignUp {
        pub email: String,
        pub password: String,
        #[serde(default)]
        pub full_name: Option<String>,
    }

    /// Restrictions for the service listing
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ServiceFilter {
        pub service_type: Option<ServiceType>,
        pub approved_only: bool,
    }

    impl ServiceFilter {
        /// Only approved listings, any type
        pub fn approved() -> Self {
            Self {
                service_type: None,
                approved_only: true,
            }
        }

        /// Builder method: restrict to one type
        pub fn of_type(mut self, service_type: ServiceType) -> Self {
            self.service_type = Some(service_type);
            self
        }

        /// Check a row against this filter
        pub fn matches(&self, service: &Service) -> bool {
            if self.approved_only && !service.is_approved() {
                return false;
            }
            match self.service_type {
                Some(t) => service.service_type == t,
                None => true,
            }
        }
    }

    /// Operations the portal consumes from the hosted backend
    ///
    /// Data operations take the caller's `Session` so the hosted store can
    /// apply row-level security with the user's own token.
    #[async_trait]
    pub trait Backend: Send + Sync {
        /// Exchange e-mail and password for a session
        async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session>;

        /// Register an account; `None` when confirmation is still pending
        async fn sign_up(&self, request: &SignUp) -> BackendResult<Option<Session>>;

        /// Trade a refresh token for a fresh session
        async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session>;

        /// Resolve an access token to its session; `None` if it is not valid
        async fn get_session(&self, access_token: &str) -> BackendResult<Option<Session>>;

        /// Revoke the session
        async fn sign_out(&self, session: &Session) -> BackendResult<()>;

        /// Receive session-change notifications
        fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

        /// Fetch the caller's profile row, if one exists
        async fn fetch_profile(&self, session: &Session) -> BackendResult<Option<Profile>>;

        /// Fetch every campus map entry ordered by name
        async fn list_locations(&self, session: &Session) -> BackendResult<Vec<CampusLocation>>;

        /// Fetch service listings ordered by name
        async fn list_services(
            &self,
            session: &Session,
            filter: &ServiceFilter,
        ) -> BackendResult<Vec<Service>>;

        /// Fetch reviews newest first, optionally for one service
        async fn list_reviews(
            &self,
            session: &Session,
            service_id: Option<Uuid>,
        ) -> BackendResult<Vec<Review>>;

        /// Lightweight reachability probe
        async fn health_check(&self) -> BackendResult<()>;
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_service_filter_matches() {
            let hostel =
                Service::new(Uuid::new_v4(), "Sunrise", ServiceType::Hostel).approved(true);
            let mess = Service::new(Uuid::new_v4(), "College Mess", ServiceType::Mess);

            let all = ServiceFilter::default();
            assert!(all.matches(&hostel));
            assert!(all.matches(&mess));

            let approved = ServiceFilter::approved();
            assert!(approved.matches(&hostel));
            assert!(!approved.matches(&mess));

            let hostels = ServiceFilter::default().of_type(ServiceType::Hostel);
            assert!(hostels.matches(&hostel));
            assert!(!hostels.matches(&mess));
        }
    }
}
