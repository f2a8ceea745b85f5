use contracts::dashboards::d410_sales_overview::chart::ChartMode;
use contracts::dashboards::d410_sales_overview::period::PeriodMode;
use contracts::dashboards::d410_sales_overview::selection::SelectionState;
use contracts::dashboards::d410_sales_overview::AvailablePeriods;
use leptos::prelude::*;
use thaw::*;

use crate::shared::components::multi_select::ChipMultiSelect;

const MODES: [PeriodMode; 3] = [PeriodMode::Year, PeriodMode::Month, PeriodMode::DateRange];

/// Year / month / date-range selector driving the KPI cards.
#[component]
pub fn PeriodFilterBar(
    selection: RwSignal<SelectionState>,
    #[prop(into)] periods: Signal<AvailablePeriods>,
) -> impl IntoView {
    let mode = Memo::new(move |_| selection.with(|s| s.period.mode));

    let mode_buttons = MODES
        .iter()
        .map(|&m| {
            let appearance = Signal::derive(move || {
                if mode.get() == m {
                    ButtonAppearance::Primary
                } else {
                    ButtonAppearance::Secondary
                }
            });
            view! {
                <Button
                    appearance=appearance
                    size=ButtonSize::Small
                    on_click=move |_| periods.with_untracked(|p| selection.update(|s| s.set_period_mode(m, p)))
                >
                    {m.label()}
                </Button>
            }
        })
        .collect_view();

    let year_select = move || {
        let current = selection.with(|s| s.period.year.clone());
        view! {
            <select
                class="period-filter__select"
                on:change=move |ev| {
                    let year = event_target_value(&ev);
                    periods.with_untracked(|p| selection.update(|s| s.set_period_year(year, p)));
                }
            >
                {periods.get().years().into_iter().map(|y| {
                    let value = y.to_string();
                    let selected = value == current;
                    view! { <option value=value.clone() selected=selected>{value.clone()}</option> }
                }).collect_view()}
            </select>
        }
    };

    let month_select = move || {
        let (year, current) = selection.with(|s| (s.period.year_value(), s.period.month.clone()));
        let months = year.map(|y| periods.with(|p| p.months_for_year(y))).unwrap_or_default();
        view! {
            <select
                class="period-filter__select"
                on:change=move |ev| {
                    let month = event_target_value(&ev);
                    selection.update(|s| s.set_period_month(month));
                }
            >
                {months.into_iter().map(|m| {
                    let selected = m.value == current;
                    view! { <option value=m.value selected=selected>{m.label}</option> }
                }).collect_view()}
            </select>
        }
    };

    let date_inputs = move || {
        let (start, end) = selection.with(|s| (s.period.date_start.clone(), s.period.date_end.clone()));
        let end_for_start = end.clone();
        let start_for_end = start.clone();
        view! {
            <input
                type="date"
                class="period-filter__date"
                prop:value=start
                on:change=move |ev| {
                    let start = event_target_value(&ev);
                    selection.update(|s| s.set_date_range(start, end_for_start.clone()));
                }
            />
            <span class="period-filter__sep">"–"</span>
            <input
                type="date"
                class="period-filter__date"
                prop:value=end
                on:change=move |ev| {
                    let end = event_target_value(&ev);
                    selection.update(|s| s.set_date_range(start_for_end.clone(), end));
                }
            />
        }
    };

    view! {
        <div class="period-filter">
            <Flex gap=FlexGap::Small style="align-items: center; flex-wrap: wrap;">
                {mode_buttons}
                {move || match mode.get() {
                    PeriodMode::Year => year_select().into_any(),
                    PeriodMode::Month => view! { {year_select()} {month_select()} }.into_any(),
                    PeriodMode::DateRange => date_inputs().into_any(),
                }}
            </Flex>
        </div>
    }
}

/// Chart mode switch plus year, country and source chips.
#[component]
pub fn ChartFilterBar(
    selection: RwSignal<SelectionState>,
    chart_mode: RwSignal<ChartMode>,
    #[prop(into)] years: Signal<Vec<i32>>,
    #[prop(into)] options: Signal<(Vec<String>, Vec<String>)>,
) -> impl IntoView {
    let year_options = Signal::derive(move || {
        years.get().into_iter().map(|y| (y.to_string(), y.to_string())).collect::<Vec<_>>()
    });
    let country_options = Signal::derive(move || {
        options.with(|(c, _)| c.iter().map(|c| (c.clone(), c.clone())).collect::<Vec<_>>())
    });
    let source_options = Signal::derive(move || {
        options.with(|(_, s)| s.iter().map(|s| (s.clone(), s.clone())).collect::<Vec<_>>())
    });

    let mode_button = move |m: ChartMode, label: &'static str| {
        let appearance = Signal::derive(move || {
            if chart_mode.get() == m {
                ButtonAppearance::Primary
            } else {
                ButtonAppearance::Secondary
            }
        });
        view! {
            <Button appearance=appearance size=ButtonSize::Small on_click=move |_| chart_mode.set(m)>
                {label}
            </Button>
        }
    };

    view! {
        <div class="chart-filter">
            <Flex gap=FlexGap::Small style="align-items: center;">
                {mode_button(ChartMode::Bar, "Bars")}
                {mode_button(ChartMode::Trend, "Trend")}
            </Flex>
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
            <ChipMultiSelect
                label="Countries"
                options=country_options
                is_selected=Callback::new(move |key: String| selection.with(|s| s.chart_countries.is_selected(&key)))
                on_toggle=Callback::new(move |key: String| selection.update(|s| s.chart_countries.toggle(key)))
                on_all=Callback::new(move |_| {
                    let all = options.with_untracked(|(c, _)| c.clone());
                    selection.update(|s| s.chart_countries.set(all));
                })
            />
            <ChipMultiSelect
                label="Sources"
                options=source_options
                is_selected=Callback::new(move |key: String| selection.with(|s| s.chart_sources.is_selected(&key)))
                on_toggle=Callback::new(move |key: String| selection.update(|s| s.chart_sources.toggle(key)))
                on_all=Callback::new(move |_| {
                    let all = options.with_untracked(|(_, s)| s.clone());
                    selection.update(|s| s.chart_sources.set(all));
                })
            />
        </div>
    }
}
