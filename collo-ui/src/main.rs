//! Collo Portal
//!
//! Campus services portal for students, built with Leptos (WASM).
//!
//! # Pages
//!
//! - Dashboard: service cards, quick actions, notifications, trending
//! - College map: searchable list of campus locations
//! - Reviews: placeholder until ratings ship
//! - Profile: stats and sign-out
//! - Auth: sign in / sign up
//!
//! # Architecture
//!
//! Client-side rendered (CSR) application compiled to WebAssembly. It talks
//! to the Collo API over HTTP and listens for session changes on a
//! WebSocket. Row types, the route table and the search logic come from the
//! `collo` crate built without its server stack.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
