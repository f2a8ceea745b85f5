use contracts::dashboards::d410_sales_overview::breakdown::country_breakdown;
use contracts::dashboards::d410_sales_overview::DashboardAggRow;
use leptos::prelude::*;

use crate::shared::number_format::{format_euro, format_number_int};

/// Revenue per country for the selected period, highest first.
#[component]
pub fn BreakdownTable(#[prop(into)] rows: Signal<Vec<DashboardAggRow>>) -> impl IntoView {
    let breakdown = Memo::new(move |_| rows.with(|r| country_breakdown(r)));

    view! {
        <table class="breakdown-table">
            <thead>
                <tr>
                    <th>"Country"</th>
                    <th>"Sources"</th>
                    <th>"Top weather"</th>
                    <th class="num">"Orders"</th>
                    <th class="num">"Revenue"</th>
                </tr>
            </thead>
            <tbody>
                {move || breakdown.get().0.into_iter().map(|line| view! {
                    <tr>
                        <td>{line.country}</td>
                        <td>{line.sources.join(", ")}</td>
                        <td>{line.top_weather.unwrap_or_else(|| "–".to_string())}</td>
                        <td class="num">{format_number_int(line.order_count as f64)}</td>
                        <td class="num">{format_euro(line.revenue)}</td>
                    </tr>
                }).collect_view()}
            </tbody>
            <tfoot>
                <tr class="breakdown-table__totals">
                    <td colspan="3">"Total"</td>
                    <td class="num">{move || format_number_int(breakdown.get().1.order_count as f64)}</td>
                    <td class="num">{move || format_euro(breakdown.get().1.revenue)}</td>
                </tr>
            </tfoot>
        </table>
    }
}
