//! Reviews Page
//!
//! Placeholder until ratings can be submitted. Open to visitors without a
//! session.

use leptos::*;

use collo::portal::catalog::{REVIEWS_HEADER, REVIEWS_PLACEHOLDER_TEXT, REVIEWS_PLACEHOLDER_TITLE};

use crate::components::{ColloHeader, Sidebar};

#[component]
pub fn Reviews() -> impl IntoView {
    view! {
        <div class="flex min-h-screen">
            <Sidebar />
            <main class="flex-1 p-6 md:p-10">
                <ColloHeader content=REVIEWS_HEADER />
                <section class="bg-card/50 backdrop-blur-collo p-8 text-center border border-border rounded-xl">
                    <div class="text-6xl mb-4 text-collo-yellow">"★"</div>
                    <h3 class="text-xl font-bold mb-2">{REVIEWS_PLACEHOLDER_TITLE}</h3>
                    <p class="text-muted-foreground">{REVIEWS_PLACEHOLDER_TEXT}</p>
                </section>
            </main>
        </div>
    }
}
