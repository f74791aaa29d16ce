//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

use collo::portal::ProfileSummary;
use collo::Session;

use crate::api;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Signed-in session, `None` until the gate has checked it
    pub session: RwSignal<Option<Session>>,
    /// Display values of the caller's profile
    pub profile: RwSignal<ProfileSummary>,
    /// Bumped on every sign-in or token refresh; profile loads track it
    pub session_epoch: RwSignal<u64>,
    /// Session-change socket status
    pub ws_connected: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(None),
        profile: create_rw_signal(ProfileSummary::default()),
        session_epoch: create_rw_signal(0),
        ws_connected: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Record a fresh session from sign-in or sign-up
    pub fn begin_session(&self, session: Session) {
        api::store_session(&session);
        self.session.set(Some(session));
    }

    /// Note an auth-state change that keeps the user signed in
    pub fn bump_session_epoch(&self) {
        self.session_epoch.update(|epoch| *epoch += 1);
    }

    /// Forget the session locally; the caller navigates to the auth page
    pub fn end_session(&self) {
        api::clear_session();
        self.session.set(None);
        self.profile.set(ProfileSummary::default());
        self.ws_connected.set(false);
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
