//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod health;
pub mod locations;
pub mod profile;
pub mod reviews;
pub mod services;
pub mod spa;
