//! User Stats Component
//!
//! Avatar initial, name and the points / reviews / streak counters.

use leptos::*;

use collo::portal::ProfileSummary;

#[component]
pub fn UserStats(#[prop(into)] summary: Signal<ProfileSummary>) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between mb-5">
            <div class="flex items-center gap-3">
                <div class="w-10 h-10 rounded-full bg-gradient-primary flex items-center justify-center font-bold">
                    {move || summary.with(|s| s.initial.clone())}
                </div>
                <div class="text-sm font-medium">{move || summary.with(|s| s.display_name.clone())}</div>
            </div>
            <div class="flex items-center gap-4 text-sm">
                <Counter icon="📈" color="bg-collo-orange" value=Signal::derive(move || summary.with(|s| s.points)) />
                <Counter icon="★" color="bg-collo-green" value=Signal::derive(move || summary.with(|s| s.reviews)) />
                <Counter icon="🔥" color="bg-collo-red" value=Signal::derive(move || summary.with(|s| s.streak)) />
            </div>
        </div>
    }
}

#[component]
fn Counter(icon: &'static str, color: &'static str, value: Signal<i64>) -> impl IntoView {
    view! {
        <div class="flex items-center gap-1">
            <div class=format!(
                "w-5 h-5 rounded-full {} flex items-center justify-center text-[10px] text-white",
                color
            )>
                {icon}
            </div>
            <span>{move || value.get()}</span>
        </div>
    }
}
