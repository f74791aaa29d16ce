//! Service Card Component

use leptos::*;

use collo::portal::catalog::ServiceCardContent;

/// Card for one service category on the dashboard grid
#[component]
pub fn ServiceCard(service: ServiceCardContent) -> impl IntoView {
    let has_footer = service.rating.is_some() || service.location.is_some();

    view! {
        <div class="bg-card/50 backdrop-blur-collo p-6 border border-border rounded-xl \
                    hover:-translate-y-1 hover:shadow-glow hover:border-primary/50 \
                    transition-all duration-300 cursor-pointer">
            <div class=format!(
                "w-12 h-12 rounded-xl flex items-center justify-center text-2xl mb-4 {}",
                service.icon_color
            )>
                {service.icon}
            </div>
            <h3 class="text-lg font-bold text-card-foreground mb-3">{service.title}</h3>
            <p class="text-muted-foreground text-sm leading-relaxed mb-4">{service.description}</p>

            {has_footer.then(|| view! {
                <div class="flex items-center gap-4 text-sm">
                    {service.rating.map(|rating| view! {
                        <div class="flex items-center gap-1 text-collo-yellow">
                            <span>"★"</span>
                            <span>{format!("{:.1}", rating)}</span>
                        </div>
                    })}
                    {service.location.map(|location| view! {
                        <div class="flex items-center gap-1 text-muted-foreground">
                            <span>"📍"</span>
                            <span class="truncate">{location}</span>
                        </div>
                    })}
                </div>
            })}
        </div>
    }
}
