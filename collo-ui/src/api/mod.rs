//! API Access
//!
//! HTTP client for the Collo API plus the browser-side session store.

pub mod client;
pub mod session_store;

pub use client::*;
pub use session_store::{clear_session, load_session, store_session, REFRESH_MARGIN_SECS};
