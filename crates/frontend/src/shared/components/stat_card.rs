use crate::shared::icons::icon;
use contracts::dashboards::d410_sales_overview::kpi::format_delta;
use leptos::prelude::*;

#[component]
pub fn StatCard(
    /// Label displayed above the value
    label: &'static str,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Formatted value (None = loading/error)
    #[prop(into)]
    value: Signal<Option<String>>,
    /// Change % relative to the previous period
    #[prop(into)]
    change_percent: Signal<Option<f64>>,
    /// Optional subtitle below the value
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let formatted = move || value.get().unwrap_or_else(|| "–".to_string());

    let change_class = move || match change_percent.get() {
        Some(pct) if pct > 0.0 => "stat-card__change stat-card__change--up",
        Some(pct) if pct < 0.0 => "stat-card__change stat-card__change--down",
        _ => "stat-card__change stat-card__change--flat",
    };

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class="stat-card">
            <div class="stat-card__icon">
                {icon(icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                <div class=change_class title="vs previous period">
                    {move || format_delta(change_percent.get())}
                </div>
                {subtitle_view}
            </div>
        </div>
    }
}
