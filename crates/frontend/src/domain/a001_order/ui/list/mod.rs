use contracts::dashboards::d410_sales_overview::kpi::KpiSnapshot;
use contracts::domain::a001_order::aggregate::{OrderRow, StatusCatalog};
use contracts::shared::fetch::FetchState;
use leptos::prelude::*;
use std::cmp::Ordering;
use thaw::*;

use crate::dashboards::d410_sales_overview::api::get_available_periods;
use crate::domain::a001_order::api::{self, OrdersKey};
use crate::shared::components::multi_select::ChipMultiSelect;
use crate::shared::components::stat_card::StatCard;
use crate::shared::date_utils::format_date;
use crate::shared::fetcher::use_fetch;
use crate::shared::list_utils::{compare_options, get_sort_indicator, sort_list, Sortable};
use crate::shared::number_format::{format_euro, format_number_int};
use crate::shared::supabase::use_client;
use crate::system::profile::context::use_profile;

impl Sortable for OrderRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "order_number" => compare_options(&self.order_number, &other.order_number),
            "status" => compare_options(&self.status, &other.status),
            "country" => compare_options(&self.country, &other.country),
            "source" => compare_options(&self.source, &other.source),
            "net_revenue" => self.net_revenue.partial_cmp(&other.net_revenue).unwrap_or(Ordering::Equal),
            _ => self.order_date.cmp(&other.order_date),
        }
    }
}

/// Raw orders of the selected shop for the selected years.
#[component]
pub fn OrdersList() -> impl IntoView {
    let client = use_client();
    let profile = use_profile();
    let selection = profile.selection;

    let shop = Memo::new(move |_| selection.with(|s| s.shop().map(str::to_string)));
    let periods = use_fetch("available_periods", shop, {
        let client = client.clone();
        move |shop| get_available_periods(client.clone(), shop)
    });
    Effect::new(move |_| {
        periods.with(|p| {
            if let FetchState::Ready(p) = p {
                selection.update(|s| s.on_periods_loaded(p));
            }
        });
    });

    let statuses = use_fetch("order_statuses", shop, {
        let client = client.clone();
        move |_| api::list_statuses(client.clone())
    });

    let orders_key = Memo::new(move |_| {
        selection.with(|s| {
            let shop = s.shop()?;
            let mut years = s.chart_years.selected().to_vec();
            if years.is_empty() {
                return None;
            }
            years.sort_unstable_by(|a, b| b.cmp(a));
            Some(OrdersKey {
                shop: shop.to_string(),
                years,
            })
        })
    });
    let orders = use_fetch("orders", orders_key, move |key| api::list_orders(client.clone(), key));

    let (sort_field, set_sort_field) = signal("order_date".to_string());
    let (sort_ascending, set_sort_ascending) = signal(false);

    let sorted = Memo::new(move |_| {
        let mut rows = orders.with(|o| o.data().cloned().unwrap_or_default());
        sort_list(&mut rows, &sort_field.get(), sort_ascending.get());
        rows
    });

    let summary = Memo::new(move |_| {
        let catalog = statuses.with(|s| s.data().cloned().unwrap_or_default());
        orders.with(|o| o.data().map(|rows| KpiSnapshot::from_orders(rows, &catalog)))
    });

    let catalog = Memo::new(move |_| statuses.with(|s| s.data().cloned().unwrap_or_else(StatusCatalog::default)));

    let toggle_sort = move |field: &'static str| {
        move |_: leptos::ev::MouseEvent| {
            if sort_field.get_untracked() == field {
                set_sort_ascending.update(|v| *v = !*v);
            } else {
                set_sort_field.set(field.to_string());
                set_sort_ascending.set(true);
            }
        }
    };
    let header = move |field: &'static str, label: &'static str| {
        view! {
            <th class="sortable" on:click=toggle_sort(field)>
                {label}
                {move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())}
            </th>
        }
    };

    let year_options = Signal::derive(move || {
        periods.with(|p| {
            p.data()
                .map(|p| p.years().into_iter().map(|y| (y.to_string(), y.to_string())).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    });

    let error = move || {
        orders
            .with(|o| o.error().map(str::to_string))
            .or_else(|| statuses.with(|s| s.error().map(str::to_string)))
            .or_else(|| periods.with(|p| p.error().map(str::to_string)))
    };

    view! {
        <div class="orders-page">
            <div class="dashboard__header">
                <h1 class="dashboard__title">"Orders"</h1>
                <span class="dashboard__shop">{move || shop.get().unwrap_or_default()}</span>
            </div>

            <ChipMultiSelect
                label="Years"
                options=year_options
                is_selected=Callback::new(move |key: String| {
                    key.parse::<i32>().is_ok_and(|y| selection.with(|s| s.chart_years.is_selected(&y)))
                })
                on_toggle=Callback::new(move |key: String| {
                    if let Ok(y) = key.parse::<i32>() {
                        selection.update(|s| s.chart_years.toggle(y));
                    }
                })
            />

            {move || error().map(|msg| view! { <div class="alert alert--error">{msg}</div> })}

            <div class="kpi-grid">
                <StatCard
                    label="Completed revenue"
                    icon_name="revenue"
                    value=Signal::derive(move || summary.get().map(|s| format_euro(s.revenue)))
                    change_percent=Signal::derive(|| None)
                />
                <StatCard
                    label="Completed orders"
                    icon_name="orders"
                    value=Signal::derive(move || summary.get().map(|s| format_number_int(s.order_count as f64)))
                    change_percent=Signal::derive(|| None)
                />
                <StatCard
                    label="Average ticket"
                    icon_name="ticket"
                    value=Signal::derive(move || summary.get().map(|s| format_euro(s.avg_ticket)))
                    change_percent=Signal::derive(|| None)
                />
                <StatCard
                    label="Customers"
                    icon_name="customers"
                    value=Signal::derive(move || summary.get().map(|s| format_number_int(s.distinct_customers as f64)))
                    change_percent=Signal::derive(|| None)
                />
            </div>

            <Show
                when=move || !orders.with(|o| o.is_loading())
                fallback=|| view! {
                    <Flex gap=FlexGap::Small style="align-items: center; justify-content: center; padding: var(--spacing-xl);">
                        <Spinner />
                    </Flex>
                }
            >
                <div class="orders-page__count">
                    {move || format!("{} orders", format_number_int(sorted.with(|r| r.len()) as f64))}
                </div>
                <table class="orders-table">
                    <thead>
                        <tr>
                            {header("order_date", "Date")}
                            {header("order_number", "Order")}
                            {header("status", "Status")}
                            {header("country", "Country")}
                            {header("source", "Source")}
                            {header("net_revenue", "Net revenue")}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let catalog = catalog.get();
                            sorted.get().into_iter().map(|o| {
                                let completed = catalog.is_completed(o.status.as_deref());
                                let row_class = if completed { "orders-table__row" } else { "orders-table__row orders-table__row--muted" };
                                let status = o.status.clone().unwrap_or_default();
                                let label = catalog.label_of(o.status.as_deref()).map(str::to_string);
                                view! {
                                    <tr class=row_class>
                                        <td>{format_date(&o.order_date)}</td>
                                        <td>{o.order_number.map(|n| n.to_string()).unwrap_or_default()}</td>
                                        <td title=label.unwrap_or_default()>{status}</td>
                                        <td>{o.country.unwrap_or_default()}</td>
                                        <td>{o.source.unwrap_or_default()}</td>
                                        <td class="num">{format_euro(o.net_revenue)}</td>
                                    </tr>
                                }
                            }).collect_view()
                        }}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
