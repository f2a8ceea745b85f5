use contracts::dashboards::d410_sales_overview::chart::{
    build_bar_data, build_trend_series, chart_options, ChartMode,
};
use contracts::dashboards::d410_sales_overview::period::{
    comparison_available, previous_period, resolve_period,
};
use contracts::shared::fetch::FetchState;
use leptos::prelude::*;
use thaw::*;

use super::breakdown_table::BreakdownTable;
use super::chart::RevenueChart;
use super::filters::{ChartFilterBar, PeriodFilterBar};
use super::kpi_cards::KpiCards;
use crate::dashboards::d410_sales_overview::api::{self, ChartKey, PeriodKey};
use crate::shared::date_utils::local_today;
use crate::shared::fetcher::use_fetch;
use crate::shared::icons::icon;
use crate::shared::supabase::use_client;
use crate::system::profile::context::use_profile;

/// Sales overview: KPI cards for the selected period, revenue chart over the
/// selected years, per-country breakdown.
#[component]
pub fn SalesOverviewDashboard() -> impl IntoView {
    let client = use_client();
    let profile = use_profile();
    let selection = profile.selection;
    let today = local_today();

    let shop = Memo::new(move |_| selection.with(|s| s.shop().map(str::to_string)));

    let periods = use_fetch("available_periods", shop, {
        let client = client.clone();
        move |shop| api::get_available_periods(client.clone(), shop)
    });

    // Default the period selector and chart years once periods arrive.
    Effect::new(move |_| {
        periods.with(|p| {
            if let FetchState::Ready(p) = p {
                selection.update(|s| s.on_periods_loaded(p));
            }
        });
    });

    let available = Signal::derive(move || periods.with(|p| p.data().cloned().unwrap_or_default()));
    let available_years = Memo::new(move |_| periods.with(|p| p.data().map(|p| p.years()).unwrap_or_default()));

    let period = Memo::new(move |_| selection.with(|s| resolve_period(s.shop(), &s.period)));
    let comparison_allowed = Memo::new(move |_| {
        period
            .get()
            .is_some_and(|p| comparison_available(&available_years.get(), &p))
    });

    let current_key = Memo::new(move |_| {
        let p = period.get()?;
        shop.get().map(|shop| PeriodKey::new(&shop, &p))
    });
    let previous_key = Memo::new(move |_| {
        if !comparison_allowed.get() {
            return None;
        }
        selection.with(|s| {
            let shop = s.shop()?;
            previous_period(Some(shop), &s.period, today).map(|p| PeriodKey::new(shop, &p))
        })
    });

    let kpis = use_fetch("kpis", current_key, {
        let client = client.clone();
        move |key| api::get_kpis(client.clone(), key)
    });
    let previous_kpis = use_fetch("kpis_previous", previous_key, {
        let client = client.clone();
        move |key| api::get_kpis(client.clone(), key)
    });
    let dashboard_agg = use_fetch("dashboard_agg", current_key, {
        let client = client.clone();
        move |key| api::get_dashboard_agg(client.clone(), key)
    });

    let chart_key = Memo::new(move |_| {
        selection.with(|s| {
            let shop = s.shop()?;
            let mut years = s.chart_years.selected().to_vec();
            if years.is_empty() {
                return None;
            }
            years.sort_unstable_by(|a, b| b.cmp(a));
            Some(ChartKey {
                shop: shop.to_string(),
                years,
            })
        })
    });
    let chart_rows = use_fetch("chart_agg", chart_key, move |key| api::get_chart_agg(client.clone(), key));

    let options = Memo::new(move |_| chart_rows.with(|r| r.data().map(|rows| chart_options(rows)).unwrap_or_default()));

    // Prune country/source selections whenever a new row set lands.
    Effect::new(move |_| {
        let (countries, sources) = options.get();
        if chart_rows.with(|r| r.data().is_some()) {
            selection.update(|s| s.on_chart_options_loaded(&countries, &sources));
        }
    });

    let chart_mode = RwSignal::new(ChartMode::Bar);
    let chart_filter = Memo::new(move |_| {
        let (countries, sources) = options.get();
        selection.with(|s| s.chart_filter(&countries, &sources))
    });
    let bars = Memo::new(move |_| {
        let filter = chart_filter.get();
        chart_rows.with(|r| r.data().map(|rows| build_bar_data(rows, &filter)).unwrap_or_default())
    });
    let trend = Memo::new(move |_| {
        let filter = chart_filter.get();
        chart_rows.with(|r| r.data().map(|rows| build_trend_series(rows, &filter)).unwrap_or_default())
    });

    let error = move || {
        periods
            .with(|s| s.error().map(str::to_string))
            .or_else(|| kpis.with(|s| s.error().map(str::to_string)))
            .or_else(|| dashboard_agg.with(|s| s.error().map(str::to_string)))
            .or_else(|| chart_rows.with(|s| s.error().map(str::to_string)))
    };

    let no_shop = move || profile.profile.with(|p| p.data().is_some()) && shop.get().is_none();
    let no_data = move || periods.with(|p| p.data().is_some_and(|p| p.is_empty()));

    view! {
        <div class="dashboard">
            <div class="dashboard__header">
                <h1 class="dashboard__title">"Sales overview"</h1>
                <span class="dashboard__shop">{move || shop.get().unwrap_or_default()}</span>
            </div>

            {move || error().map(|msg| view! {
                <div class="alert alert--error">
                    {icon("alert")}
                    <span>{msg}</span>
                </div>
            })}

            <Show when=no_shop>
                <div class="dashboard__empty">"No shop is enabled for this account."</div>
            </Show>

            <Show when=no_data>
                <div class="dashboard__empty">"No orders recorded for this shop yet."</div>
            </Show>

            <section class="dashboard__section">
                <PeriodFilterBar selection=selection periods=available />
                <Show when=move || kpis.with(|k| k.is_loading())>
                    <Flex gap=FlexGap::Small style="align-items: center; padding: var(--spacing-md);">
                        <Spinner />
                        <span>"Loading KPIs..."</span>
                    </Flex>
                </Show>
                <KpiCards
                    current=kpis
                    previous=previous_kpis
                    comparison_allowed=Signal::derive(move || comparison_allowed.get())
                />
            </section>

            <section class="dashboard__section">
                <h2 class="dashboard__subtitle">"Revenue by month"</h2>
                <ChartFilterBar
                    selection=selection
                    chart_mode=chart_mode
                    years=Signal::derive(move || available_years.get())
                    options=Signal::derive(move || options.get())
                />
                <Show when=move || chart_rows.with(|c| c.is_loading())>
                    <Flex gap=FlexGap::Small style="align-items: center; justify-content: center; padding: var(--spacing-xl);">
                        <Spinner />
                    </Flex>
                </Show>
                <RevenueChart
                    mode=Signal::derive(move || chart_mode.get())
                    bars=Signal::derive(move || bars.get())
                    trend=Signal::derive(move || trend.get())
                    today=today
                />
            </section>

            <section class="dashboard__section">
                <h2 class="dashboard__subtitle">"Countries in period"</h2>
                <BreakdownTable rows=Signal::derive(move || {
                    dashboard_agg.with(|a| a.data().cloned().unwrap_or_default())
                }) />
            </section>
        </div>
    }
}
