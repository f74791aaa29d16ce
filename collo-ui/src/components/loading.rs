//! Loading Placeholders

use leptos::*;

/// Skeleton loader for the location grid
#[component]
pub fn CardSkeleton(
    #[prop(default = 3)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4 animate-pulse">
            {(0..count).map(|_| view! {
                <div class="bg-background/50 rounded-lg p-4 border border-border">
                    <div class="h-4 bg-muted rounded w-1/2 mb-3" />
                    <div class="h-3 bg-muted rounded w-1/3 mb-4" />
                    <div class="h-8 bg-muted rounded" />
                </div>
            }).collect_view()}
        </div>
    }
}
