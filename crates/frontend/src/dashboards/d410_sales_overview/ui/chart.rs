//! Revenue chart: stacked bars per (month, year) or one line per year, drawn
//! as inline SVG with a hover tooltip.

use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d410_sales_overview::chart::{
    bar_tooltip_rows, trend_tooltip_rows, y_axis_max, y_ticks, BarMonth, ChartMode, TooltipRow, TrendSeries,
    MONTHS_SHORT,
};
use leptos::prelude::*;

use crate::shared::number_format::{format_axis_euro, format_euro};

const WIDTH: f64 = 920.0;
const HEIGHT: f64 = 300.0;
const PAD_TOP: f64 = 10.0;
const PAD_RIGHT: f64 = 14.0;
const PAD_BOTTOM: f64 = 28.0;
const PAD_LEFT: f64 = 44.0;
const GROUP_WIDTH: f64 = 54.0;
const BAR_GAP: f64 = 6.0;

/// Maps months and values to SVG coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    y_max: f64,
}

impl Geometry {
    fn inner_width() -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn inner_height() -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn x_for_month(month_index: usize) -> f64 {
        PAD_LEFT + Self::inner_width() * (month_index as f64 + 0.5) / 12.0
    }

    fn y_for_value(&self, value: f64) -> f64 {
        let max = if self.y_max > 0.0 { self.y_max } else { 1.0 };
        PAD_TOP + Self::inner_height() - Self::inner_height() * value / max
    }

    /// Width of one bar when `bars_in_group` bars share a month slot.
    fn bar_width(bars_in_group: usize) -> f64 {
        let n = bars_in_group.max(1) as f64;
        ((GROUP_WIDTH - BAR_GAP * (n - 1.0)) / n).floor().max(10.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tooltip {
    title: String,
    rows: Vec<TooltipRow>,
}

fn trend_path(geometry: &Geometry, series: &TrendSeries) -> String {
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let cmd = if i == 0 { "M" } else { "L" };
            format!("{} {:.2} {:.2}", cmd, Geometry::x_for_month(i), geometry.y_for_value(*v))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
pub fn RevenueChart(
    #[prop(into)] mode: Signal<ChartMode>,
    #[prop(into)] bars: Signal<Vec<BarMonth>>,
    #[prop(into)] trend: Signal<Vec<TrendSeries>>,
    today: NaiveDate,
) -> impl IntoView {
    let tooltip = RwSignal::new(None::<Tooltip>);
    let pointer = RwSignal::new((0.0_f64, 0.0_f64));
    let wrapper = NodeRef::<leptos::html::Div>::new();

    let geometry = Memo::new(move |_| Geometry {
        y_max: bars.with(|b| trend.with(|t| y_axis_max(mode.get(), b, t))),
    });

    let on_move = move |ev: leptos::ev::MouseEvent| {
        if let Some(el) = wrapper.get() {
            let rect = el.get_bounding_client_rect();
            pointer.set((ev.client_x() as f64 - rect.left() + 12.0, ev.client_y() as f64 - rect.top() + 12.0));
        }
    };

    let grid = move || {
        let g = geometry.get();
        y_ticks(g.y_max)
            .into_iter()
            .enumerate()
            .map(|(idx, tick)| {
                let y = g.y_for_value(tick);
                let (stroke, dash) = if idx == 0 { ("#E2E8F0", "") } else { ("#EEF2F7", "3 4") };
                view! {
                    <g>
                        <line x1=PAD_LEFT x2={WIDTH - PAD_RIGHT} y1=y y2=y stroke=stroke stroke-dasharray=dash />
                        <text x={PAD_LEFT - 10.0} y={y + 4.0} text-anchor="end" font-size="11" fill="#94A3B8">
                            {format_axis_euro(tick)}
                        </text>
                    </g>
                }
            })
            .collect_view()
    };

    let month_labels = MONTHS_SHORT
        .iter()
        .enumerate()
        .map(|(i, m)| {
            view! {
                <text x={Geometry::x_for_month(i)} y={HEIGHT - 8.0} text-anchor="middle" font-size="11" fill="#94A3B8">
                    {*m}
                </text>
            }
        })
        .collect_view();

    let bar_layer = move || {
        let g = geometry.get();
        let data = bars.get();
        let per_group = data.iter().map(|m| m.bars.len()).max().unwrap_or(1);
        let bar_w = Geometry::bar_width(per_group);
        data.into_iter()
            .map(|month| {
                let group_left = Geometry::x_for_month(month.month_index) - GROUP_WIDTH / 2.0;
                month
                    .bars
                    .into_iter()
                    .enumerate()
                    .map(|(idx, bar)| {
                        let x = group_left + idx as f64 * (bar_w + BAR_GAP);
                        let title = format!("Year {} • {}", bar.year, MONTHS_SHORT[month.month_index]);
                        let rows = bar_tooltip_rows(&bar);
                        let mut acc = 0.0;
                        let segments = bar
                            .segments
                            .iter()
                            .map(|seg| {
                                let y0 = g.y_for_value(acc + seg.value);
                                let y1 = g.y_for_value(acc);
                                acc += seg.value;
                                view! {
                                    <rect x=x y=y0 width=bar_w height={(y1 - y0).max(0.0)} fill=seg.color opacity="0.95" />
                                }
                            })
                            .collect_view();
                        view! {
                            <g on:mouseenter=move |_| tooltip.set(Some(Tooltip { title: title.clone(), rows: rows.clone() }))>
                                {segments}
                                <rect x=x y=PAD_TOP width=bar_w height={Geometry::inner_height()} fill="transparent" />
                            </g>
                        }
                    })
                    .collect_view()
            })
            .collect_view()
    };

    let trend_layer = move || {
        let g = geometry.get();
        let series = trend.get();
        let marker = series.iter().any(|s| s.year == today.year()).then(|| {
            let x = Geometry::x_for_month(today.month0() as usize);
            view! {
                <line x1=x x2=x y1=PAD_TOP y2={HEIGHT - PAD_BOTTOM} stroke="#94A3B8" stroke-dasharray="4 4" stroke-width="1.5" opacity="0.6" />
            }
        });
        let paths = series
            .iter()
            .map(|s| {
                view! { <path d={trend_path(&g, s)} fill="none" stroke=s.color stroke-width="3.2" opacity="0.95" /> }
            })
            .collect_view();
        let hover = (0..12)
            .map(|i| {
                let rows = trend_tooltip_rows(&series, i);
                view! {
                    <rect
                        x={Geometry::x_for_month(i) - 22.0}
                        y=0
                        width=44
                        height=HEIGHT
                        fill="transparent"
                        on:mouseenter=move |_| tooltip.set(Some(Tooltip { title: MONTHS_SHORT[i].to_string(), rows: rows.clone() }))
                    />
                }
            })
            .collect_view();
        view! { <g>{marker}{paths}{hover}</g> }
    };

    view! {
        <div class="revenue-chart" node_ref=wrapper on:mousemove=on_move on:mouseleave=move |_| tooltip.set(None)>
            <svg viewBox={format!("0 0 {} {}", WIDTH, HEIGHT)} class="revenue-chart__svg">
                {grid}
                {month_labels}
                {move || match mode.get() {
                    ChartMode::Bar => bar_layer().into_any(),
                    ChartMode::Trend => trend_layer().into_any(),
                }}
            </svg>
            {move || tooltip.get().map(|t| {
                let (x, y) = pointer.get();
                view! {
                    <div class="revenue-chart__tooltip" style={format!("left: {}px; top: {}px;", x, y)}>
                        <div class="revenue-chart__tooltip-title">{t.title}</div>
                        {t.rows.into_iter().map(|r| view! {
                            <div class="revenue-chart__tooltip-row">
                                <span>
                                    {r.color.map(|c| view! {
                                        <span class="revenue-chart__dot" style={format!("background-color: {};", c)}></span>
                                    })}
                                    {r.label}
                                </span>
                                <span class="revenue-chart__tooltip-value">{format_euro(r.value)}</span>
                            </div>
                        }).collect_view()}
                    </div>
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_slots_are_centered() {
        let inner = WIDTH - PAD_LEFT - PAD_RIGHT;
        assert_eq!(Geometry::x_for_month(0), PAD_LEFT + inner / 24.0);
        assert_eq!(Geometry::x_for_month(11), PAD_LEFT + inner * 23.0 / 24.0);
    }

    #[test]
    fn test_value_scale() {
        let g = Geometry { y_max: 1000.0 };
        assert_eq!(g.y_for_value(0.0), HEIGHT - PAD_BOTTOM);
        assert_eq!(g.y_for_value(1000.0), PAD_TOP);
        // empty chart keeps every value on the baseline
        let empty = Geometry { y_max: 0.0 };
        assert_eq!(empty.y_for_value(0.0), HEIGHT - PAD_BOTTOM);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(Geometry::bar_width(1), 54.0);
        assert_eq!(Geometry::bar_width(2), 24.0);
        assert_eq!(Geometry::bar_width(6), 10.0);
        assert_eq!(Geometry::bar_width(0), 54.0);
    }
}
