//! Session Gate
//!
//! Protected pages call [`use_session_gate`] on mount. It checks the stored
//! session with the API, sends the visitor to the auth page when there is
//! none, and otherwise keeps a socket open so a sign-out elsewhere lands
//! here too. The socket is closed when the page unmounts.

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use collo::portal::AUTH_PATH;
use collo::{AuthEventKind, Session};

use super::global::GlobalState;
use crate::api::{self, ClientError};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Messages pushed by the server
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected {
        connection_id: String,
        user_id: String,
    },
    AuthStateChanged {
        event: AuthEventKind,
        signed_in: bool,
        #[serde(default)]
        redirect: Option<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

impl WsMessage {
    /// Where to go when this message ends the session
    pub fn signed_out_redirect(&self) -> Option<String> {
        match self {
            WsMessage::AuthStateChanged {
                signed_in: false,
                redirect,
                ..
            } => Some(redirect.clone().unwrap_or_else(|| AUTH_PATH.to_string())),
            _ => None,
        }
    }
}

/// Backoff before reconnect attempt `attempt` (0-based)
fn reconnect_delay_ms(attempt: u32) -> u32 {
    2_u32.saturating_pow(attempt).saturating_mul(1000).min(30_000)
}

type Redirect = Rc<dyn Fn(&str)>;

/// Session-change socket with reconnect
pub struct SessionSocket {
    ws: RefCell<Option<WebSocket>>,
    url: String,
    attempts: Cell<u32>,
    closed: Cell<bool>,
    state: GlobalState,
    redirect: Redirect,
}

impl SessionSocket {
    pub fn open(url: String, state: GlobalState, redirect: Redirect) -> Rc<Self> {
        let socket = Rc::new(Self {
            ws: RefCell::new(None),
            url,
            attempts: Cell::new(0),
            closed: Cell::new(false),
            state,
            redirect,
        });
        socket.connect();
        socket
    }

    fn connect(self: &Rc<Self>) {
        if self.closed.get() {
            return;
        }

        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                self.schedule_reconnect();
            }
        }
    }

    fn setup_handlers(self: &Rc<Self>, ws: &WebSocket) {
        let this = Rc::clone(self);
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            this.state.ws_connected.set(true);
            this.attempts.set(0);
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let this = Rc::clone(self);
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text: String = text.into();
                this.handle_message(&text);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let this = Rc::clone(self);
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            let reason = format!(
                "WebSocket closed: code={}, reason={}",
                event.code(),
                event.reason()
            );
            web_sys::console::log_1(&reason.into());
            this.state.ws_connected.set(false);
            this.schedule_reconnect();
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    fn schedule_reconnect(self: &Rc<Self>) {
        if self.closed.get() {
            return;
        }

        let attempts = self.attempts.get();
        if attempts >= MAX_RECONNECT_ATTEMPTS {
            web_sys::console::error_1(&"Max reconnect attempts reached".into());
            return;
        }
        self.attempts.set(attempts + 1);

        let this = Rc::clone(self);
        gloo_timers::callback::Timeout::new(reconnect_delay_ms(attempts), move || {
            this.connect();
        })
        .forget();
    }

    fn handle_message(&self, text: &str) {
        let msg = match serde_json::from_str::<WsMessage>(text) {
            Ok(msg) => msg,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("Failed to parse WebSocket message: {}", e).into(),
                );
                return;
            }
        };

        if let Some(target) = msg.signed_out_redirect() {
            self.close();
            self.state.end_session();
            (self.redirect)(&target);
            return;
        }

        match msg {
            WsMessage::Connected { connection_id, .. } => {
                web_sys::console::log_1(&format!("Connected with ID: {}", connection_id).into());
            }
            WsMessage::Error { message } => {
                self.state.show_error(&message);
            }
            WsMessage::AuthStateChanged { signed_in: true, .. } => {
                self.state.bump_session_epoch();
            }
            WsMessage::AuthStateChanged { .. } | WsMessage::Pong => {}
        }
    }

    /// Close for good; no reconnect follows
    pub fn close(&self) {
        self.closed.set(true);
        if let Some(ws) = self.ws.borrow_mut().take() {
            let _ = ws.close();
        }
    }
}

/// Milliseconds until `session` is due for renewal (`None` if it never is)
fn renewal_delay_ms(session: &Session, now: chrono::DateTime<chrono::Utc>) -> Option<u32> {
    session.refresh_token.as_ref()?;
    let due = session.expires_at? - api::REFRESH_MARGIN_SECS;
    let millis = (due - now.timestamp()).saturating_mul(1000);
    Some(millis.clamp(0, i32::MAX as i64) as u32)
}

/// Pending token renewal of one mounted page
#[derive(Default)]
struct Renewal {
    timer: RefCell<Option<Timeout>>,
    stopped: Cell<bool>,
}

impl Renewal {
    /// Cancel the pending timer; later schedules are ignored
    fn stop(&self) {
        self.stopped.set(true);
        self.timer.borrow_mut().take();
    }
}

/// Renew the session shortly before it expires, then again for the new one
fn schedule_renewal(
    renewal: Rc<Renewal>,
    session: &Session,
    state: GlobalState,
    redirect: Redirect,
) {
    if renewal.stopped.get() {
        return;
    }
    let Some(delay) = renewal_delay_ms(session, chrono::Utc::now()) else {
        return;
    };

    let next = Rc::clone(&renewal);
    let timer = Timeout::new(delay, move || {
        spawn_local(async move {
            match api::renew_session_if_due().await {
                Ok(Some(session)) => {
                    schedule_renewal(next, &session, state.clone(), redirect);
                    state.session.set(Some(session));
                }
                // Another page renewed it first
                Ok(None) => {
                    if let Some(session) = api::load_session() {
                        schedule_renewal(next, &session, state, redirect);
                    }
                }
                Err(ClientError::SessionRequired) => {
                    state.end_session();
                    redirect(AUTH_PATH);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Session refresh failed: {}", e).into());
                }
            }
        });
    });
    *renewal.timer.borrow_mut() = Some(timer);
}

/// Gate a page on a live session
///
/// Returns a signal that turns true once the session is confirmed. Pages
/// render nothing until then. A token that is expired or close to it is
/// renewed first when a refresh token is stored, and again while the page
/// stays open.
pub fn use_session_gate() -> Signal<bool> {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    let redirect: Redirect = Rc::new(move |path: &str| {
        navigate(
            path,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        )
    });

    let socket: Rc<RefCell<Option<Rc<SessionSocket>>>> = Rc::new(RefCell::new(None));
    let renewal = Rc::new(Renewal::default());
    let disposed = Rc::new(Cell::new(false));

    let state_for_check = state.clone();
    let socket_slot = Rc::clone(&socket);
    let renewal_for_check = Rc::clone(&renewal);
    let disposed_for_check = Rc::clone(&disposed);
    spawn_local(async move {
        let state = state_for_check;
        match api::renew_session_if_due().await {
            Ok(_) | Err(ClientError::SessionRequired) => {}
            Err(e) => {
                web_sys::console::error_1(&format!("Session refresh failed: {}", e).into());
            }
        }

        let session = match api::fetch_session().await {
            Ok(session) => session,
            Err(ClientError::SessionRequired) => None,
            // API unreachable: trust the stored session and let the page's
            // own requests surface the outage
            Err(e) => {
                state.show_error(&e.to_string());
                api::load_session()
            }
        };

        if disposed_for_check.get() {
            return;
        }

        let Some(session) = session else {
            state.end_session();
            redirect(AUTH_PATH);
            return;
        };

        // `/session` does not echo the refresh token or expiry; the stored
        // copy has them
        let session = match api::load_session() {
            Some(stored) if stored.access_token == session.access_token => stored,
            _ => session,
        };

        let url = api::ws_url(&api::get_api_base(), &session.access_token);
        schedule_renewal(renewal_for_check, &session, state.clone(), Rc::clone(&redirect));
        state.session.set(Some(session));
        *socket_slot.borrow_mut() = Some(SessionSocket::open(url, state.clone(), redirect));
    });

    on_cleanup(move || {
        disposed.set(true);
        renewal.stop();
        if let Some(socket) = socket.borrow_mut().take() {
            socket.close();
        }
    });

    Signal::derive(move || state.session.with(|s| s.is_some()))
}

/// Drop the session and go to the auth page
///
/// For data requests the API rejected with `SESSION_REQUIRED`.
pub fn use_end_session() -> Callback<()> {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let navigate = use_navigate();
    Callback::new(move |_| {
        state.end_session();
        navigate(
            AUTH_PATH,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_out_message_redirects() {
        let msg: WsMessage = serde_json::from_str(
            r#"{"type":"auth_state_changed","event":"signed_out","signed_in":false,"redirect":"/auth"}"#,
        )
        .unwrap();
        assert_eq!(msg.signed_out_redirect(), Some("/auth".to_string()));
    }

    #[test]
    fn test_sign_out_without_redirect_defaults_to_auth() {
        let msg = WsMessage::AuthStateChanged {
            event: AuthEventKind::SignedOut,
            signed_in: false,
            redirect: None,
        };
        assert_eq!(msg.signed_out_redirect(), Some(AUTH_PATH.to_string()));
    }

    #[test]
    fn test_refresh_keeps_session() {
        let msg: WsMessage = serde_json::from_str(
            r#"{"type":"auth_state_changed","event":"token_refreshed","signed_in":true}"#,
        )
        .unwrap();
        assert_eq!(msg.signed_out_redirect(), None);
        assert_eq!(WsMessage::Pong.signed_out_redirect(), None);
    }

    fn session(expires_at: Option<i64>, refresh_token: Option<&str>) -> Session {
        serde_json::from_value(serde_json::json!({
            "access_token": "abc",
            "refresh_token": refresh_token,
            "expires_at": expires_at,
            "user": { "id": "8a1f6c2e-0000-4000-8000-000000000001" }
        }))
        .unwrap()
    }

    #[test]
    fn test_renewal_delay() {
        let now = chrono::Utc::now();
        let in_an_hour = Some(now.timestamp() + 3600);

        assert_eq!(
            renewal_delay_ms(&session(in_an_hour, Some("def")), now),
            Some((3600 - api::REFRESH_MARGIN_SECS) as u32 * 1000)
        );
        assert_eq!(
            renewal_delay_ms(&session(Some(now.timestamp() - 10), Some("def")), now),
            Some(0)
        );
        assert_eq!(renewal_delay_ms(&session(in_an_hour, None), now), None);
        assert_eq!(renewal_delay_ms(&session(None, Some("def")), now), None);
    }

    #[test]
    fn test_reconnect_backoff() {
        assert_eq!(reconnect_delay_ms(0), 1000);
        assert_eq!(reconnect_delay_ms(3), 8000);
        assert_eq!(reconnect_delay_ms(10), 30_000);
    }
}
