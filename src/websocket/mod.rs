//! WebSocket Session Notifications
//!
//! Pushes session changes (sign-in, sign-out, token refresh) to the pages a
//! user has open, so a protected page can leave for `/auth` the moment its
//! session ends.
//!
//! ## Architecture
//!
//! - **SessionHub**: Open connections, indexed by user id
//! - **Handler**: Token-checked upgrade and connection lifecycle
//! - **Messages**: Client and server message formats
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket(`ws://localhost:8080/api/v1/ws?token=${accessToken}`);
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'auth_state_changed' && !msg.signed_in) {
//!     location.assign(msg.redirect);
//!   }
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{HubConfig, HubError, SessionHub};
pub use messages::{ClientMessage, ServerMessage, SessionEvent};
