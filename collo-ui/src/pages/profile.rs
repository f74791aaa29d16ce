//! Profile Page
//!
//! Avatar, counters and the logout button.

use leptos::*;
use leptos_router::use_navigate;

use collo::portal::catalog::{LOGGED_OUT, PROFILE_HEADER};
use collo::portal::AUTH_PATH;

use super::load_profile;
use crate::api;
use crate::components::{ColloHeader, Sidebar};
use crate::state::{use_end_session, use_session_gate, GlobalState};

/// Profile page component
#[component]
pub fn Profile() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let granted = use_session_gate();
    let end_session = use_end_session();
    let navigate = use_navigate();

    // Refetch on every sign-in or token refresh, not just on mount
    let state_for_effect = state.clone();
    create_effect(move |_| {
        let _epoch = state_for_effect.session_epoch.get();
        if granted.get() {
            load_profile(state_for_effect.clone(), end_session);
        }
    });

    let (signing_out, set_signing_out) = create_signal(false);
    let state_for_logout = state.clone();
    let logout = move |_: ev::MouseEvent| {
        set_signing_out.set(true);
        let state = state_for_logout.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            // The local session goes regardless of what the API says
            if let Err(e) = api::sign_out().await {
                web_sys::console::error_1(&format!("Sign-out request failed: {}", e).into());
            }
            state.end_session();
            state.show_success(LOGGED_OUT);
            navigate(AUTH_PATH, Default::default());
        });
    };

    let summary = state.profile;

    view! {
        <Show when=move || granted.get()>
            <div class="flex min-h-screen">
                <Sidebar />
                <main class="flex-1 p-6 md:p-10">
                    <ColloHeader content=PROFILE_HEADER />
                    <section class="bg-card/50 backdrop-blur-collo p-8 border border-border rounded-xl max-w-2xl">
                        <div class="flex items-center gap-6 mb-8">
                            <div class="w-20 h-20 rounded-full bg-gradient-primary flex items-center justify-center text-3xl font-bold">
                                {move || summary.with(|s| s.initial.clone())}
                            </div>
                            <div>
                                <h2 class="text-2xl font-bold mb-2">
                                    {move || summary.with(|s| s.display_name.clone())}
                                </h2>
                                <p class="text-muted-foreground">"Active Member"</p>
                            </div>
                        </div>

                        <div class="grid grid-cols-3 gap-4 mb-8">
                            <StatTile label="Points" color="text-collo-orange" value=Signal::derive(move || summary.with(|s| s.points)) />
                            <StatTile label="Reviews" color="text-collo-green" value=Signal::derive(move || summary.with(|s| s.reviews)) />
                            <StatTile label="Day Streak" color="text-collo-red" value=Signal::derive(move || summary.with(|s| s.streak)) />
                        </div>

                        <button
                            on:click=logout.clone()
                            disabled=move || signing_out.get()
                            class="w-full px-4 py-3 rounded-lg bg-destructive hover:opacity-90 font-medium"
                        >
                            "⎋ Logout"
                        </button>
                    </section>
                </main>
            </div>
        </Show>
    }
}

#[component]
fn StatTile(label: &'static str, color: &'static str, value: Signal<i64>) -> impl IntoView {
    view! {
        <div class="bg-background/50 p-4 text-center border border-border rounded-lg">
            <div class=format!("text-3xl font-bold mb-1 {}", color)>{move || value.get()}</div>
            <div class="text-sm text-muted-foreground">{label}</div>
        </div>
    }
}
