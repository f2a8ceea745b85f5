//! Chart bucketing: turns pre-aggregated `(year, month, country, source)`
//! rows into a 12-month trend per year and a 12-month stacked bar dataset
//! bucketed by country.

use super::dto::ChartAggRow;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const PALETTE: [&str; 8] = [
    "#2563EB", "#10B981", "#F59E0B", "#8B5CF6", "#EF4444", "#06B6D4", "#EC4899", "#84CC16",
];

/// Synthetic bucket holding every country outside the top ranks.
pub const OTHER_KEY: &str = "Other";
pub const OTHER_COLOR: &str = "#94A3B8";
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Countries shown individually when no explicit country filter is set.
pub const MAX_STACKS: usize = 6;

/// Gridlines above zero on the y axis.
pub const Y_TICK_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartMode {
    #[default]
    Bar,
    Trend,
}

/// Active chart filters. Empty `countries`/`sources` mean "no filter"; a
/// non-empty `countries` is an explicit country selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFilter {
    pub years: Vec<i32>,
    pub countries: Vec<String>,
    pub sources: Vec<String>,
}

impl ChartFilter {
    fn accepts(&self, row: &ChartAggRow) -> bool {
        (1..=12).contains(&row.month)
            && self.years.contains(&row.year)
            && (self.sources.is_empty() || self.sources.iter().any(|s| s == row.source.trim()))
            && (self.countries.is_empty() || self.countries.iter().any(|c| *c == country_key(row)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackSegment {
    pub key: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearBar {
    pub year: i32,
    pub segments: Vec<StackSegment>,
}

impl YearBar {
    pub fn total(&self) -> f64 {
        self.segments.iter().fold(0.0, |acc, s| acc + s.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarMonth {
    /// 0..=11
    pub month_index: usize,
    pub bars: Vec<YearBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub label: String,
    pub year: i32,
    pub color: &'static str,
    pub values: [f64; 12],
}

/// Country bucket key of a row; blank countries share one key.
pub fn country_key(row: &ChartAggRow) -> String {
    let country = row.country.trim();
    if country.is_empty() {
        UNKNOWN_COUNTRY.to_string()
    } else {
        country.to_string()
    }
}

/// Case-insensitive collation with a byte-order tie break.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Distinct country keys and sources present in `rows`, sorted.
pub fn chart_options(rows: &[ChartAggRow]) -> (Vec<String>, Vec<String>) {
    let mut countries: Vec<String> = rows.iter().map(country_key).collect();
    countries.sort_by(|a, b| compare_keys(a, b));
    countries.dedup();
    let mut sources: Vec<String> = rows
        .iter()
        .map(|r| r.source.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    sources.sort_by(|a, b| compare_keys(a, b));
    sources.dedup();
    (countries, sources)
}

/// One series per selected year with monthly revenue, zero-filled.
pub fn build_trend_series(rows: &[ChartAggRow], filter: &ChartFilter) -> Vec<TrendSeries> {
    filter
        .years
        .iter()
        .enumerate()
        .map(|(idx, &year)| {
            let mut values = [0.0; 12];
            for row in rows.iter().filter(|r| r.year == year && filter.accepts(r)) {
                values[(row.month - 1) as usize] += row.revenue;
            }
            TrendSeries {
                label: format!("Year {}", year),
                year,
                color: palette_color(idx),
                values,
            }
        })
        .collect()
}

/// Countries ranked by total revenue, highest first, ties alphabetical.
fn rank_countries(rows: &[&ChartAggRow]) -> Vec<String> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in rows {
        *totals.entry(country_key(row)).or_insert(0.0) += row.revenue;
    }
    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|(ka, va), (kb, vb)| {
        vb.partial_cmp(va)
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_keys(ka, kb))
    });
    ranked.into_iter().map(|(key, _)| key).collect()
}

/// Country -> bucket key and bucket key -> colour.
struct Bucketing {
    bucket_of: HashMap<String, String>,
    colors: HashMap<String, &'static str>,
}

impl Bucketing {
    fn new(ranked: &[String], explicit_countries: bool) -> Self {
        let overflow = !explicit_countries && ranked.len() > MAX_STACKS;
        let mut bucket_of = HashMap::new();
        let mut colors = HashMap::new();
        for (rank, country) in ranked.iter().enumerate() {
            if overflow && rank >= MAX_STACKS {
                bucket_of.insert(country.clone(), OTHER_KEY.to_string());
            } else {
                bucket_of.insert(country.clone(), country.clone());
                colors.insert(country.clone(), palette_color(rank));
            }
        }
        if overflow {
            colors.insert(OTHER_KEY.to_string(), OTHER_COLOR);
        }
        Self { bucket_of, colors }
    }

    fn segments(&self, rows: &[&ChartAggRow]) -> Vec<StackSegment> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for row in rows {
            if let Some(bucket) = self.bucket_of.get(&country_key(row)) {
                *sums.entry(bucket.as_str()).or_insert(0.0) += row.revenue;
            }
        }
        let mut segments: Vec<StackSegment> = sums
            .into_iter()
            .map(|(key, value)| StackSegment {
                key: key.to_string(),
                value,
                color: self.colors.get(key).copied().unwrap_or(OTHER_COLOR),
            })
            .collect();
        segments.sort_by(|a, b| compare_keys(&a.key, &b.key));
        segments
    }
}

/// Twelve month buckets, each with one stacked bar per selected year.
///
/// With an explicit country filter every selected country is its own
/// segment and other countries are dropped. Otherwise the six countries with
/// the highest revenue across the filtered rows get their own segment and the
/// rest are summed into [`OTHER_KEY`]. Years without data still get a bar,
/// with no segments.
pub fn build_bar_data(rows: &[ChartAggRow], filter: &ChartFilter) -> Vec<BarMonth> {
    let filtered: Vec<&ChartAggRow> = rows.iter().filter(|r| filter.accepts(r)).collect();
    let ranked = rank_countries(&filtered);
    let bucketing = Bucketing::new(&ranked, !filter.countries.is_empty());

    (0..12)
        .map(|month_index| {
            let month = month_index as u32 + 1;
            let bars = filter
                .years
                .iter()
                .map(|&year| {
                    let cell: Vec<&ChartAggRow> = filtered
                        .iter()
                        .copied()
                        .filter(|r| r.year == year && r.month == month)
                        .collect();
                    YearBar {
                        year,
                        segments: bucketing.segments(&cell),
                    }
                })
                .collect();
            BarMonth { month_index, bars }
        })
        .collect()
}

/// Smallest value of the 1-2-5 ladder (times a power of ten) that is
/// `>= value`. Non-positive input gives `0`.
pub fn nice_max(value: f64) -> f64 {
    if !(value > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let base = 10f64.powf(value.log10().floor());
    let scaled = value / base;
    let rounded = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    rounded * base
}

/// Shared y-axis maximum for the active chart mode.
pub fn y_axis_max(mode: ChartMode, bars: &[BarMonth], trend: &[TrendSeries]) -> f64 {
    let max = match mode {
        ChartMode::Bar => bars
            .iter()
            .flat_map(|m| m.bars.iter().map(YearBar::total))
            .fold(0.0, f64::max),
        ChartMode::Trend => trend
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max),
    };
    nice_max(max)
}

/// Gridline values from zero to `max`, equally spaced.
pub fn y_ticks(max: f64) -> Vec<f64> {
    if max <= 0.0 {
        return vec![0.0];
    }
    (0..=Y_TICK_STEPS)
        .map(|i| max / Y_TICK_STEPS as f64 * i as f64)
        .collect()
}

/// One line of a chart tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: f64,
    pub color: Option<&'static str>,
}

/// Tooltip of a stacked bar: non-zero segments by value, then the total.
pub fn bar_tooltip_rows(bar: &YearBar) -> Vec<TooltipRow> {
    let mut rows: Vec<TooltipRow> = bar
        .segments
        .iter()
        .filter(|s| s.value > 0.0)
        .map(|s| TooltipRow {
            label: s.key.clone(),
            value: s.value,
            color: Some(s.color),
        })
        .collect();
    rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    let total = bar.total();
    if total > 0.0 {
        rows.push(TooltipRow {
            label: "Total".to_string(),
            value: total,
            color: None,
        });
    }
    rows
}

/// Tooltip of a trend month: every series by value.
pub fn trend_tooltip_rows(series: &[TrendSeries], month_index: usize) -> Vec<TooltipRow> {
    let mut rows: Vec<TooltipRow> = series
        .iter()
        .map(|s| TooltipRow {
            label: s.label.clone(),
            value: s.values.get(month_index).copied().unwrap_or(0.0),
            color: Some(s.color),
        })
        .collect();
    rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    rows
}
