//! Dashboard Page
//!
//! Service cards, quick actions, and a side column with the user's stats,
//! notifications and trending listings.

use leptos::*;

use collo::portal::catalog::{
    trending, DASHBOARD_HEADER, DASHBOARD_SERVICES, NOTIFICATIONS, QUICK_ACTIONS,
};

use super::load_profile;
use crate::components::{ColloHeader, ServiceCard, Sidebar, UserStats};
use crate::state::{use_end_session, use_session_gate, GlobalState};

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let granted = use_session_gate();
    let end_session = use_end_session();

    // Refetch on every sign-in or token refresh, not just on mount
    let state_for_effect = state.clone();
    create_effect(move |_| {
        let _epoch = state_for_effect.session_epoch.get();
        if granted.get() {
            load_profile(state_for_effect.clone(), end_session);
        }
    });

    let summary = state.profile;

    view! {
        <Show when=move || granted.get()>
            <div class="flex min-h-screen">
                <Sidebar />

                <main class="flex-1 p-6 md:p-10 overflow-y-auto">
                    <ColloHeader content=DASHBOARD_HEADER />

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-6 mb-8">
                        {DASHBOARD_SERVICES
                            .iter()
                            .map(|service| view! { <ServiceCard service=*service /> })
                            .collect_view()}
                    </div>

                    <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                        {QUICK_ACTIONS
                            .iter()
                            .map(|label| view! {
                                <button class="px-4 py-3 rounded-lg bg-gradient-primary hover:opacity-90 font-medium">
                                    {*label}
                                </button>
                            })
                            .collect_view()}
                    </div>
                </main>

                <aside class="w-[320px] p-5 md:p-8 flex-col gap-5 hidden lg:flex">
                    <UserStats summary=summary />
                    <Notifications />
                    <Trending />
                </aside>
            </div>
        </Show>
    }
}

#[component]
fn Notifications() -> impl IntoView {
    view! {
        <section class="bg-card/50 backdrop-blur-collo p-5 border border-border rounded-xl">
            <h3 class="text-lg font-bold mb-4">"🔔 Notifications"</h3>
            <div class="space-y-3">
                {NOTIFICATIONS
                    .iter()
                    .map(|n| view! {
                        <div class="flex items-center gap-3 pb-3 border-b border-border">
                            <div class=format!(
                                "w-8 h-8 rounded-lg {} flex items-center justify-center text-sm",
                                n.color
                            )>
                                {n.icon}
                            </div>
                            <div class="flex-1 text-sm">
                                <div class="font-medium">{n.title}</div>
                                <div class="text-muted-foreground text-xs">{n.detail}</div>
                            </div>
                        </div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn Trending() -> impl IntoView {
    view! {
        <section class="bg-card/50 backdrop-blur-collo p-5 border border-border rounded-xl">
            <h3 class="text-lg font-bold mb-4">"📈 Trending"</h3>
            <div class="space-y-3">
                {trending()
                    .into_iter()
                    .map(|(name, rating)| view! {
                        <div class="flex justify-between items-center pb-3 border-b border-border last:border-0">
                            <div class="text-sm font-medium">{name}</div>
                            <div class="flex items-center gap-1 text-collo-yellow text-sm">
                                <span>"⭐"</span>
                                <span>{rating}</span>
                            </div>
                        </div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
