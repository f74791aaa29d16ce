//! Sidebar Navigation
//!
//! Brand plus one link per portal section. The entry matching the current
//! path exactly is highlighted. Plain anchors are routed client-side by the
//! surrounding `<Router>`.

use leptos::*;
use leptos_router::use_location;

use collo::portal::{active_nav_item, NavItem, NAV_ITEMS};

use crate::state::GlobalState;

/// Sidebar navigation component
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let location = use_location();
    let active = Signal::derive(move || {
        location
            .pathname
            .with(|path| active_nav_item(path).map(|item| item.path))
    });

    view! {
        <nav class="w-[280px] bg-card/80 backdrop-blur-collo p-5 flex flex-col gap-2 border-r border-border">
            <div class="text-[32px] font-bold bg-gradient-primary bg-clip-text text-transparent mb-8 tracking-tight">
                "COLLO"
            </div>

            {NAV_ITEMS
                .iter()
                .map(|item| view! { <SidebarLink item=*item active=active /> })
                .collect_view()}

            // Session socket status
            <div class="mt-auto flex items-center gap-2 text-xs text-muted-foreground">
                {move || {
                    if state.ws_connected.get() {
                        view! {
                            <span class="w-2 h-2 bg-collo-green rounded-full" />
                            <span>"Live"</span>
                        }.into_view()
                    } else {
                        view! {
                            <span class="w-2 h-2 bg-muted rounded-full" />
                            <span>"Offline"</span>
                        }.into_view()
                    }
                }}
            </div>
        </nav>
    }
}

#[component]
fn SidebarLink(item: NavItem, active: Signal<Option<&'static str>>) -> impl IntoView {
    let class = move || {
        if active.get() == Some(item.path) {
            "flex items-center px-4 py-3 rounded-xl transition-all duration-300 font-medium \
             bg-gradient-primary text-white shadow-glow"
        } else {
            "flex items-center px-4 py-3 rounded-xl transition-all duration-300 font-medium \
             hover:bg-primary/20 hover:translate-x-1"
        }
    };

    view! {
        <a href=item.path class=class>
            <div class=format!(
                "w-7 h-7 rounded-md {} flex items-center justify-center mr-3 text-white text-sm",
                item.color
            )>
                {item.icon}
            </div>
            <span>{item.title}</span>
        </a>
    }
}
