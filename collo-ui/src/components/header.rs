//! Page Header
//!
//! Gradient banner at the top of every portal page.

use leptos::*;

use collo::portal::catalog::HeaderContent;

/// Header banner with an optional "Explore Services" button
#[component]
pub fn ColloHeader(
    content: HeaderContent,
    #[prop(optional, into)]
    on_explore: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="bg-gradient-primary rounded-[20px] p-6 md:p-8 text-center shadow-glow mb-8">
            <div class="opacity-90 mb-2 text-sm font-medium">{content.subtitle}</div>
            <h1 class="text-2xl md:text-3xl font-bold mb-4">{content.title}</h1>
            {content.show_explore.then(|| view! {
                <button
                    class="px-4 py-2 rounded-lg bg-white/20 hover:bg-white/30 hover:-translate-y-0.5 transition-all"
                    on:click=move |_| {
                        if let Some(cb) = on_explore {
                            cb.call(());
                        }
                    }
                >
                    "🔍 Explore Services"
                </button>
            })}
        </div>
    }
}
