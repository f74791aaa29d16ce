//! In-process backend
//!
//! Holds accounts, sessions and table rows in memory. The test suite runs
//! the API against it, and `collo serve --demo` uses it with seed data so
//! the portal can be explored without a hosted project.

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::error::{BackendError, BackendResult};
use super::types::{
    AuthEvent, AuthUser, CampusLocation, LocationType, Profile, Review, Service, ServiceType,
    Session,
};
use super::{Backend, Credentials, ServiceFilter, SignUp};

/// Session lifetime handed out by the in-process auth
const SESSION_TTL_SECS: i64 = 3600;

/// Refresh tokens outlive the access token they were issued with
const REFRESH_TTL_SECS: i64 = 30 * 24 * 3600;

struct Account {
    password: String,
    user: AuthUser,
}

impl Account {
    fn new(email: &str, password: &str, full_name: Option<&str>) -> Self {
        let metadata = match full_name {
            Some(name) => serde_json::json!({ "full_name": name }),
            None => serde_json::json!({}),
        };
        Self {
            password: password.to_string(),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
                user_metadata: metadata,
            },
        }
    }
}

struct RefreshGrant {
    access_token: String,
    user: AuthUser,
    expires_at: i64,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    services: Vec<Service>,
    reviews: Vec<Review>,
    campus_map: Vec<CampusLocation>,
}

/// In-memory `Backend`
pub struct MemoryBackend {
    accounts: RwLock<HashMap<String, Account>>,
    /// access token -> session
    sessions: RwLock<HashMap<String, Session>>,
    refresh_tokens: RwLock<HashMap<String, RefreshGrant>>,
    tables: RwLock<Tables>,
    events: broadcast::Sender<AuthEvent>,
    /// When set, every data call fails as if the store were unreachable
    offline: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            refresh_tokens: RwLock::new(HashMap::new()),
            tables: RwLock::new(Tables::default()),
            events,
            offline: AtomicBool::new(false),
        }
    }

    /// Create a backend with a demo account and sample rows
    ///
    /// Demo login: `student@collo.dev` / `collo-demo`.
    pub async fn with_demo_data() -> Self {
        let backend = Self::new();
        let user_id = backend
            .create_account("student@collo.dev", "collo-demo", Some("Aarav Sharma"))
            .await;
        backend
            .insert_profile(Profile::new(user_id).full_name("Aarav Sharma").counters(120, 4, 3))
            .await;

        for location in demo_locations() {
            backend.insert_location(location).await;
        }
        let services = demo_services();
        if let Some(hostel) = services.first() {
            for review in demo_reviews(hostel.id, user_id) {
                backend.insert_review(review).await;
            }
        }
        for service in services {
            backend.insert_service(service).await;
        }

        tracing::info!("Demo backend seeded (login: student@collo.dev / collo-demo)");
        backend
    }

    /// Register an account directly, returning its user id
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Uuid {
        let account = Account::new(email, password, full_name);
        let id = account.user.id;
        self.accounts
            .write()
            .await
            .insert(email.to_lowercase(), account);
        id
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.tables.write().await.profiles.insert(profile.id, profile);
    }

    pub async fn insert_location(&self, location: CampusLocation) {
        self.tables.write().await.campus_map.push(location);
    }

    pub async fn insert_service(&self, service: Service) {
        self.tables.write().await.services.push(service);
    }

    pub async fn insert_review(&self, review: Review) {
        self.tables.write().await.reviews.push(review);
    }

    /// Simulate the store going down (or coming back)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn ensure_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable)
        } else {
            Ok(())
        }
    }

    /// Reject tokens this backend did not issue or has revoked
    async fn authorize(&self, session: &Session) -> BackendResult<()> {
        self.ensure_online()?;
        if self.sessions.read().await.contains_key(&session.access_token) {
            Ok(())
        } else {
            Err(BackendError::SessionExpired)
        }
    }

    async fn issue_session(&self, user: AuthUser) -> Session {
        let now = chrono::Utc::now().timestamp();
        let refresh_token = Uuid::new_v4().simple().to_string();
        let session = Session {
            access_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Some(refresh_token.clone()),
            expires_at: Some(now + SESSION_TTL_SECS),
            user,
        };

        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session.clone());
        let grant = RefreshGrant {
            access_token: session.access_token.clone(),
            user: session.user.clone(),
            expires_at: now + REFRESH_TTL_SECS,
        };
        self.refresh_tokens.write().await.insert(refresh_token, grant);

        session
    }

    /// Drop expired access sessions and refresh grants
    async fn prune_expired(&self) {
        let now = chrono::Utc::now();
        let pruned = {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, session| !session.is_expired_at(now));
            before - sessions.len()
        };
        self.refresh_tokens
            .write()
            .await
            .retain(|_, grant| grant.expires_at > now.timestamp());

        if pruned > 0 {
            tracing::debug!(pruned, "Pruned expired sessions");
        }
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.ensure_online()?;

        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&credentials.email.to_lowercase())
                .filter(|a| a.password == credentials.password)
                .ok_or(BackendError::InvalidCredentials)?;
            account.user.clone()
        };

        let session = self.issue_session(user).await;
        let _ = self.events.send(AuthEvent::signed_in(session.user_id()));
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUp) -> BackendResult<Option<Session>> {
        self.ensure_online()?;

        if request.password.len() < 6 {
            return Err(BackendError::ApiError {
                status: 422,
                message: "Password should be at least 6 characters".to_string(),
            });
        }
        let user_id = match self.accounts.write().await.entry(request.email.to_lowercase()) {
            Entry::Occupied(_) => {
                return Err(BackendError::ApiError {
                    status: 422,
                    message: "User already registered".to_string(),
                });
            }
            Entry::Vacant(slot) => {
                let account = Account::new(
                    &request.email,
                    &request.password,
                    request.full_name.as_deref(),
                );
                slot.insert(account).user.id
            }
        };

        // The hosted project creates the profile row from a trigger.
        let mut profile = Profile::new(user_id);
        profile.full_name = request.full_name.clone();
        self.insert_profile(profile).await;

        let credentials = Credentials {
            email: request.email.clone(),
            password: request.password.clone(),
        };
        self.sign_in(&credentials).await.map(Some)
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<Session> {
        self.ensure_online()?;

        let grant = self
            .refresh_tokens
            .write()
            .await
            .remove(refresh_token)
            .filter(|grant| grant.expires_at > chrono::Utc::now().timestamp())
            .ok_or(BackendError::SessionExpired)?;
        self.sessions.write().await.remove(&grant.access_token);

        let session = self.issue_session(grant.user).await;
        let _ = self.events.send(AuthEvent::token_refreshed(session.user_id()));
        Ok(session)
    }

    async fn get_session(&self, access_token: &str) -> BackendResult<Option<Session>> {
        self.ensure_online()?;

        self.prune_expired().await;
        Ok(self.sessions.read().await.get(access_token).cloned())
    }

    async fn sign_out(&self, session: &Session) -> BackendResult<()> {
        self.ensure_online()?;

        let removed = self.sessions.write().await.remove(&session.access_token);
        let refresh = removed
            .and_then(|s| s.refresh_token)
            .or_else(|| session.refresh_token.clone());
        if let Some(refresh) = refresh {
            self.refresh_tokens.write().await.remove(&refresh);
        }

        let _ = self.events.send(AuthEvent::signed_out(session.user_id()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, session: &Session) -> BackendResult<Option<Profile>> {
        self.authorize(session).await?;
        Ok(self
            .tables
            .read()
            .await
            .profiles
            .get(&session.user_id())
            .cloned())
    }

    async fn list_locations(&self, session: &Session) -> BackendResult<Vec<CampusLocation>> {
        self.authorize(session).await?;
        let mut rows = self.tables.read().await.campus_map.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_services(
        &self,
        session: &Session,
        filter: &ServiceFilter,
    ) -> BackendResult<Vec<Service>> {
        self.authorize(session).await?;
        let mut rows: Vec<Service> = self
            .tables
            .read()
            .await
            .services
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_reviews(
        &self,
        session: &Session,
        service_id: Option<Uuid>,
    ) -> BackendResult<Vec<Review>> {
        self.authorize(session).await?;
        let mut rows: Vec<Review> = self
            .tables
            .read()
            .await
            .reviews
            .iter()
            .filter(|r| service_id.is_none() || r.service_id == service_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn health_check(&self) -> BackendResult<()> {
        self.ensure_online()
    }
}

fn demo_locations() -> Vec<CampusLocation> {
    vec![
        CampusLocation::new(Uuid::new_v4(), "Central Library", LocationType::Library)
            .building("Block A", Some(1))
            .description("Reading halls, journals and the digital resource centre"),
        CampusLocation::new(Uuid::new_v4(), "Physics Lab 2", LocationType::Lab)
            .building("Science Block", Some(2)),
        CampusLocation::new(Uuid::new_v4(), "Main Canteen", LocationType::Canteen)
            .building("Student Centre", Some(0))
            .description("Open 7am to 10pm"),
        CampusLocation::new(Uuid::new_v4(), "Room 101", LocationType::Classroom)
            .building("Block B", Some(1)),
        CampusLocation::new(Uuid::new_v4(), "Dean's Office", LocationType::Office)
            .building("Admin Block", Some(3)),
        CampusLocation::new(Uuid::new_v4(), "Open Air Theatre", LocationType::Auditorium)
            .coordinates(12.9716, 77.5946),
        CampusLocation::new(Uuid::new_v4(), "Cricket Ground", LocationType::Sports),
    ]
}

fn demo_services() -> Vec<Service> {
    vec![
        Service::new(Uuid::new_v4(), "Sunrise Hostel", ServiceType::Hostel)
            .description("Twin sharing rooms, 5 minutes from the main gate")
            .rating(4.5)
            .location("North Campus Road")
            .approved(true),
        Service::new(Uuid::new_v4(), "College Mess", ServiceType::Mess)
            .description("Veg and non-veg monthly plans")
            .rating(4.6)
            .approved(true),
        Service::new(Uuid::new_v4(), "IIT Tutor", ServiceType::Tutor)
            .description("JEE and GATE coaching")
            .rating(4.7)
            .approved(true),
        Service::new(Uuid::new_v4(), "Campus Shuttle", ServiceType::Transport)
            .description("Hourly shuttle to the metro station")
            .approved(false),
    ]
}

fn demo_reviews(service_id: Uuid, user_id: Uuid) -> Vec<Review> {
    let now = chrono::Utc::now();
    [(5, "Clean rooms and a quiet study hall", 2), (4, "Good food, slow wifi", 9)]
        .into_iter()
        .map(|(rating, comment, days_ago)| Review {
            id: Uuid::new_v4(),
            service_id: Some(service_id),
            user_id: Some(user_id),
            rating: Some(rating),
            comment: Some(comment.to_string()),
            created_at: Some(now - chrono::Duration::days(days_ago)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_and_resolve_session() {
        let backend = MemoryBackend::new();
        let user_id = backend.create_account("a@collo.dev", "secret1", None).await;

        let session = backend.sign_in(&creds("A@collo.dev", "secret1")).await.unwrap();
        assert_eq!(session.user_id(), user_id);

        let resolved = backend.get_session(&session.access_token).await.unwrap();
        assert_eq!(resolved.map(|s| s.user_id()), Some(user_id));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;

        let result = backend.sign_in(&creds("a@collo.dev", "nope")).await;
        assert!(matches!(result, Err(BackendError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_and_notifies() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        let session = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();

        let mut events = backend.subscribe();
        backend.sign_out(&session).await.unwrap();

        assert!(backend.get_session(&session.access_token).await.unwrap().is_none());
        let event = events.recv().await.unwrap();
        assert_eq!(event, AuthEvent::signed_out(session.user_id()));
        assert_eq!(backend.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        let session = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();
        let refresh = session.refresh_token.clone().unwrap();

        let fresh = backend.refresh_session(&refresh).await.unwrap();
        assert_ne!(fresh.access_token, session.access_token);
        assert!(backend.get_session(&session.access_token).await.unwrap().is_none());

        // Refresh tokens are single use.
        assert!(matches!(
            backend.refresh_session(&refresh).await,
            Err(BackendError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile_row() {
        let backend = MemoryBackend::new();
        let request = SignUp {
            email: "new@collo.dev".to_string(),
            password: "secret1".to_string(),
            full_name: Some("Meera".to_string()),
        };

        let session = backend.sign_up(&request).await.unwrap().unwrap();
        let profile = backend.fetch_profile(&session).await.unwrap().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Meera"));
        assert!(profile.points.is_none());

        let again = backend.sign_up(&request).await;
        assert!(matches!(again, Err(BackendError::ApiError { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_locations_ordered_by_name() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        backend
            .insert_location(CampusLocation::new(Uuid::new_v4(), "Zoology Lab", LocationType::Lab))
            .await;
        backend
            .insert_location(CampusLocation::new(
                Uuid::new_v4(),
                "Auditorium",
                LocationType::Auditorium,
            ))
            .await;
        let session = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();

        let names: Vec<_> = backend
            .list_locations(&session)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Auditorium", "Zoology Lab"]);
    }

    #[tokio::test]
    async fn test_revoked_session_cannot_read_rows() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        let session = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();
        backend.sign_out(&session).await.unwrap();

        assert!(matches!(
            backend.list_locations(&session).await,
            Err(BackendError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_offline_backend_is_unavailable() {
        let backend = MemoryBackend::new();
        backend.set_offline(true);
        assert!(matches!(
            backend.health_check().await,
            Err(BackendError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_demo_data_seeded() {
        let backend = MemoryBackend::with_demo_data().await;
        let session = backend
            .sign_in(&creds("student@collo.dev", "collo-demo"))
            .await
            .unwrap();

        let profile = backend.fetch_profile(&session).await.unwrap().unwrap();
        assert_eq!(profile.points, Some(120));

        let approved = backend
            .list_services(&session, &ServiceFilter::approved())
            .await
            .unwrap();
        assert_eq!(approved.len(), 3);

        let hostel = approved
            .iter()
            .find(|s| s.name == "Sunrise Hostel")
            .map(|s| s.id);
        assert!(hostel.is_some());
        let reviews = backend.list_reviews(&session, hostel).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, Some(5));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        let live = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();
        let stale = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();

        {
            let mut sessions = backend.sessions.write().await;
            if let Some(session) = sessions.get_mut(&stale.access_token) {
                session.expires_at = Some(chrono::Utc::now().timestamp() - 1);
            }
        }
        backend
            .refresh_tokens
            .write()
            .await
            .insert(
                "old-grant".to_string(),
                RefreshGrant {
                    access_token: "gone".to_string(),
                    user: live.user.clone(),
                    expires_at: chrono::Utc::now().timestamp() - 1,
                },
            );

        assert!(backend.get_session(&stale.access_token).await.unwrap().is_none());
        assert!(backend.get_session(&live.access_token).await.unwrap().is_some());
        assert_eq!(backend.session_count().await, 1);
        assert!(!backend.refresh_tokens.read().await.contains_key("old-grant"));
    }

    #[tokio::test]
    async fn test_expired_access_token_can_still_refresh() {
        let backend = MemoryBackend::new();
        backend.create_account("a@collo.dev", "secret1", None).await;
        let session = backend.sign_in(&creds("a@collo.dev", "secret1")).await.unwrap();

        {
            let mut sessions = backend.sessions.write().await;
            if let Some(s) = sessions.get_mut(&session.access_token) {
                s.expires_at = Some(chrono::Utc::now().timestamp() - 1);
            }
        }
        assert!(backend.get_session(&session.access_token).await.unwrap().is_none());

        let refresh = session.refresh_token.clone().unwrap();
        let fresh = backend.refresh_session(&refresh).await.unwrap();
        assert!(backend.get_session(&fresh.access_token).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sign_up_registers_once() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let request = SignUp {
            email: "race@collo.dev".to_string(),
            password: "secret1".to_string(),
            full_name: None,
        };

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let backend = std::sync::Arc::clone(&backend);
                let request = request.clone();
                tokio::spawn(async move { backend.sign_up(&request).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => {
                    assert!(matches!(err, BackendError::ApiError { status: 422, .. }))
                }
            }
        }
        assert_eq!(created, 1);
        assert_eq!(backend.accounts.read().await.len(), 1);
    }
}
