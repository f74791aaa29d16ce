//! Route table and sidebar navigation
//!
//! Maps URL paths to pages. Shared by the browser router and by the host
//! server, which uses it to pick the status code for deep links.

use serde::Serialize;

/// Where the session gate sends visitors without a session
pub const AUTH_PATH: &str = "/auth";

/// A page of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Auth,
    CollegeMap,
    Reviews,
    Profile,
    NotFound,
}

/// Paths that currently render the dashboard until they get their own views
pub const DASHBOARD_ALIASES: &[&str] = &["/tutoring", "/transport", "/pets", "/add-service"];

impl Page {
    /// Resolve a request path to a page
    ///
    /// Query strings and fragments are ignored and a single trailing slash
    /// is tolerated. Anything unmatched, at any depth, is `NotFound`.
    pub fn resolve(path: &str) -> Page {
        let path = path
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        match path {
            "" | "/" => Page::Dashboard,
            "/auth" => Page::Auth,
            "/map" => Page::CollegeMap,
            "/reviews" => Page::Reviews,
            "/profile" => Page::Profile,
            p if DASHBOARD_ALIASES.contains(&p) => Page::Dashboard,
            _ => Page::NotFound,
        }
    }
}

/// One entry of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Sidebar entries, top to bottom
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        title: "Services",
        path: "/",
        icon: "▦",
        color: "bg-collo-orange",
    },
    NavItem {
        title: "Reviews",
        path: "/reviews",
        icon: "★",
        color: "bg-collo-green",
    },
    NavItem {
        title: "College Map",
        path: "/map",
        icon: "🗺",
        color: "bg-collo-blue",
    },
    NavItem {
        title: "Tutoring",
        path: "/tutoring",
        icon: "🎓",
        color: "bg-collo-purple",
    },
    NavItem {
        title: "Transport",
        path: "/transport",
        icon: "🚗",
        color: "bg-collo-red",
    },
    NavItem {
        title: "Pets",
        path: "/pets",
        icon: "🐕",
        color: "bg-[#f97316]",
    },
    NavItem {
        title: "Add Service",
        path: "/add-service",
        icon: "+",
        color: "bg-collo-green",
    },
    NavItem {
        title: "Profile",
        path: "/profile",
        icon: "👤",
        color: "bg-collo-gray",
    },
];

/// Sidebar entry active for a path (exact match, like the router's `end`)
pub fn active_nav_item(path: &str) -> Option<&'static NavItem> {
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    NAV_ITEMS.iter().find(|item| item.path == path)
}
