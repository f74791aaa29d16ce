//! College Map Page
//!
//! Campus locations fetched once, then narrowed in memory on every
//! keystroke.

use leptos::*;

use collo::portal::catalog::{
    location_badge_class, DIRECTIONS_COMING_SOON, LOCATIONS_LOAD_FAILED, MAP_HEADER,
    MAP_SEARCH_PLACEHOLDER,
};
use collo::portal::search::{count_label, location_subtitle};
use collo::portal::LocationSearch;
use collo::CampusLocation;

use crate::api::{self, ClientError};
use crate::components::{CardSkeleton, ColloHeader, Sidebar};
use crate::state::{use_end_session, use_session_gate, GlobalState};

/// College map page component
#[component]
pub fn CollegeMap() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let granted = use_session_gate();
    let end_session = use_end_session();

    let locations = create_rw_signal(Vec::<CampusLocation>::new());
    let (loading, set_loading) = create_signal(true);
    let (query, set_query) = create_signal(String::new());

    let state_for_effect = state.clone();
    create_effect(move |fetched: Option<bool>| {
        if fetched == Some(true) || !granted.get() {
            return fetched.unwrap_or(false);
        }

        let state = state_for_effect.clone();
        spawn_local(async move {
            match api::fetch_locations().await {
                Ok(rows) => locations.set(rows),
                Err(ClientError::SessionRequired) => end_session.call(()),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch locations: {}", e).into());
                    state.show_error(LOCATIONS_LOAD_FAILED);
                }
            }
            set_loading.set(false);
        });
        true
    });

    let search = Signal::derive(move || query.with(|q| LocationSearch::new(q.clone())));
    let filtered = Signal::derive(move || {
        locations.with(|all| {
            search.with(|s| s.apply(all).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    view! {
        <Show when=move || granted.get()>
            <div class="flex min-h-screen">
                <Sidebar />

                <main class="flex-1 p-6 md:p-10 overflow-y-auto">
                    <ColloHeader content=MAP_HEADER />

                    <div class="mb-6 relative">
                        <span class="absolute left-3 top-1/2 -translate-y-1/2 text-muted-foreground">"🔍"</span>
                        <input
                            type="text"
                            placeholder=MAP_SEARCH_PLACEHOLDER
                            prop:value=move || query.get()
                            on:input=move |ev| set_query.set(event_target_value(&ev))
                            class="w-full pl-10 h-12 rounded-lg bg-white/5 border border-input focus:outline-none"
                        />
                    </div>

                    <section class="bg-card/50 backdrop-blur-collo p-6 border border-border rounded-xl">
                        <div class="flex items-center justify-between mb-4">
                            <h3 class="text-lg font-bold">"Campus Locations"</h3>
                            <span class="px-2 py-1 rounded-md bg-secondary text-xs">
                                {move || filtered.with(|f| count_label(f.len()))}
                            </span>
                        </div>

                        {move || {
                            if loading.get() {
                                return view! { <CardSkeleton /> }.into_view();
                            }

                            let rows = filtered.get();
                            if rows.is_empty() {
                                let empty = search.with(|s| s.empty_state());
                                view! {
                                    <div class="text-center py-12 text-muted-foreground">
                                        <div class="text-5xl mb-3 opacity-50">"📍"</div>
                                        <p>{empty.title}</p>
                                        <p class="text-sm mt-2">{empty.hint}</p>
                                    </div>
                                }
                                .into_view()
                            } else {
                                view! {
                                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                        {rows
                                            .into_iter()
                                            .map(|location| view! { <LocationCard location=location /> })
                                            .collect_view()}
                                    </div>
                                }
                                .into_view()
                            }
                        }}
                    </section>
                </main>
            </div>
        </Show>
    }
}

/// One location in the grid
#[component]
fn LocationCard(location: CampusLocation) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let subtitle = location_subtitle(&location);
    let badge = location_badge_class(location.location_type);

    view! {
        <div class="bg-background/50 p-4 border border-border rounded-lg hover:border-primary/50 \
                    transition-all cursor-pointer hover:-translate-y-1">
            <div class="flex items-start justify-between mb-3">
                <div class="flex-1">
                    <h4 class="font-semibold text-card-foreground mb-1">{location.name.clone()}</h4>
                    <div class="text-xs text-muted-foreground">"🏢 " {subtitle}</div>
                </div>
                <span class=format!("{} text-white text-xs px-2 py-0.5 rounded-md", badge)>
                    {location.location_type.as_str()}
                </span>
            </div>

            {location.description.clone().filter(|d| !d.is_empty()).map(|d| view! {
                <p class="text-sm text-muted-foreground mb-3 line-clamp-2">{d}</p>
            })}

            <button
                class="w-full px-3 py-1.5 text-sm rounded-md border border-border hover:bg-primary/20"
                on:click=move |ev| {
                    ev.stop_propagation();
                    state.show_success(DIRECTIONS_COMING_SOON);
                }
            >
                "🧭 Get Directions"
            </button>
        </div>
    }
}
