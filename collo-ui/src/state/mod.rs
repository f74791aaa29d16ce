//! State Management
//!
//! Global application state and the session gate.

pub mod global;
pub mod session;

pub use global::{provide_global_state, GlobalState};
pub use session::{use_end_session, use_session_gate};
