use contracts::dashboards::d410_sales_overview::kpi::{KpiDeltas, KpiSnapshot};
use contracts::shared::fetch::FetchState;
use leptos::prelude::*;

use crate::shared::components::stat_card::StatCard;
use crate::shared::number_format::{format_euro, format_number_int};

#[component]
pub fn KpiCards(
    current: RwSignal<FetchState<KpiSnapshot>>,
    previous: RwSignal<FetchState<KpiSnapshot>>,
    #[prop(into)] comparison_allowed: Signal<bool>,
) -> impl IntoView {
    let snapshot = Memo::new(move |_| current.with(|c| c.data().copied()));
    let deltas = Memo::new(move |_| {
        let Some(curr) = snapshot.get() else {
            return KpiDeltas::default();
        };
        previous.with(|p| KpiDeltas::compute(&curr, p.data(), comparison_allowed.get()))
    });

    let customers_label = move || {
        snapshot
            .get()
            .filter(|s| s.recurring_customers.is_none())
            .map(|_| "distinct customers".to_string())
    };

    view! {
        <div class="kpi-grid">
            <StatCard
                label="Revenue"
                icon_name="revenue"
                value=Signal::derive(move || snapshot.get().map(|s| format_euro(s.revenue)))
                change_percent=Signal::derive(move || deltas.get().revenue)
            />
            <StatCard
                label="Orders"
                icon_name="orders"
                value=Signal::derive(move || snapshot.get().map(|s| format_number_int(s.order_count as f64)))
                change_percent=Signal::derive(move || deltas.get().order_count)
            />
            <StatCard
                label="Average ticket"
                icon_name="ticket"
                value=Signal::derive(move || snapshot.get().map(|s| format_euro(s.avg_ticket)))
                change_percent=Signal::derive(move || deltas.get().avg_ticket)
            />
            <StatCard
                label="Recurring customers"
                icon_name="customers"
                value=Signal::derive(move || snapshot.get().map(|s| format_number_int(s.customers() as f64)))
                change_percent=Signal::derive(move || deltas.get().customers)
                subtitle=Signal::derive(customers_label)
            />
        </div>
    }
}
