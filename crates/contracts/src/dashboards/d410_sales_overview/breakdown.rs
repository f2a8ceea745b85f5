use super::dto::DashboardAggRow;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-country line of the period breakdown table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBreakdown {
    pub country: String,
    pub revenue: f64,
    pub order_count: u64,
    pub sources: Vec<String>,
    /// Weather label of the source with the highest revenue, if any.
    pub top_weather: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakdownTotals {
    pub revenue: f64,
    pub order_count: u64,
}

/// Collapse (country, source) rows to one line per country, highest revenue
/// first.
pub fn country_breakdown(rows: &[DashboardAggRow]) -> (Vec<CountryBreakdown>, BreakdownTotals) {
    let mut by_country: HashMap<String, (CountryBreakdown, f64)> = HashMap::new();
    let mut totals = BreakdownTotals::default();
    for row in rows {
        totals.revenue += row.revenue;
        totals.order_count += row.order_count;

        let key = match row.country.trim() {
            "" => "Unknown".to_string(),
            c => c.to_string(),
        };
        let (line, best) = by_country.entry(key.clone()).or_insert_with(|| {
            (
                CountryBreakdown {
                    country: key,
                    revenue: 0.0,
                    order_count: 0,
                    sources: Vec::new(),
                    top_weather: None,
                },
                f64::NEG_INFINITY,
            )
        });
        line.revenue += row.revenue;
        line.order_count += row.order_count;
        let source = row.source.trim();
        if !source.is_empty() && !line.sources.iter().any(|s| s == source) {
            line.sources.push(source.to_string());
        }
        if row.top_weather.is_some() && row.revenue > *best {
            *best = row.revenue;
            line.top_weather = row.top_weather.clone();
        }
    }
    let mut lines: Vec<CountryBreakdown> = by_country.into_values().map(|(line, _)| line).collect();
    lines.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });
    (lines, totals)
}
