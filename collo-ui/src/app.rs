//! App Root Component
//!
//! Router and global providers. Tutoring, transport, pets and add-service
//! have no views of their own yet and render the dashboard.

use leptos::*;
use leptos_router::*;

use crate::components::Toast;
use crate::pages::{Auth, CollegeMap, Dashboard, Profile, Reviews};
use crate::state::global::provide_global_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-background text-foreground">
                <Routes>
                    <Route path="/" view=Dashboard />
                    <Route path="/auth" view=Auth />
                    <Route path="/map" view=CollegeMap />
                    <Route path="/reviews" view=Reviews />
                    <Route path="/profile" view=Profile />
                    <Route path="/tutoring" view=Dashboard />
                    <Route path="/transport" view=Dashboard />
                    <Route path="/pets" view=Dashboard />
                    <Route path="/add-service" view=Dashboard />
                    <Route path="/*any" view=NotFound />
                </Routes>

                <Toast />
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    let location = use_location();

    create_effect(move |_| {
        web_sys::console::error_1(
            &format!(
                "404: user attempted to access non-existent route {}",
                location.pathname.get()
            )
            .into(),
        );
    });

    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center">
            <h1 class="text-4xl font-bold mb-4">"404"</h1>
            <p class="text-xl text-muted-foreground mb-4">"Oops! Page not found"</p>
            <A href="/" class="text-primary underline hover:opacity-80">
                "Return to Home"
            </A>
        </div>
    }
}
