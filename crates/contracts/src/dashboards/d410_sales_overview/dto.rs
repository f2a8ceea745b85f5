use crate::shared::numeric::{de_f64_or_zero, de_opt_u64, de_string_or_empty, de_u64_or_zero};
use serde::{Deserialize, Serialize};

/// Remote procedure names.
pub const RPC_AVAILABLE_PERIODS: &str = "get_available_periods";
pub const RPC_KPIS_FOR_PERIOD: &str = "get_kpis_periodo";
pub const RPC_DASHBOARD_AGG: &str = "get_dashboard_agg";
pub const RPC_CHART_AGG: &str = "get_fatturato_chart_agg";

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopParams {
    pub p_shop: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodParams {
    pub p_shop: String,
    /// `YYYY-MM-DD`
    pub p_data_inizio: String,
    /// `YYYY-MM-DD`
    pub p_data_fine: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartAggParams {
    pub p_shop: String,
    pub p_years: Vec<i32>,
}

/// A (year, month) pair for which the shop has orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub year: i32,
    pub month: u32,
}

/// Month option for the period selector: `value` is zero-padded (`"03"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    pub value: String,
    pub label: &'static str,
}

/// Distinct periods available for one shop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailablePeriods {
    rows: Vec<PeriodRow>,
}

impl AvailablePeriods {
    pub fn new(rows: Vec<PeriodRow>) -> Self {
        Self { rows }
    }

    /// Distinct years, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    pub fn earliest_year(&self) -> Option<i32> {
        self.rows.iter().map(|r| r.year).min()
    }

    /// Months with data in `year`, in calendar order.
    pub fn months_for_year(&self, year: i32) -> Vec<MonthOption> {
        (1..=12u32)
            .filter(|m| self.rows.iter().any(|r| r.year == year && r.month == *m))
            .map(|m| MonthOption {
                value: format!("{:02}", m),
                label: MONTH_NAMES[(m - 1) as usize],
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Single-row result of the KPI procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpisRow {
    #[serde(rename = "volume_ordini", default, deserialize_with = "de_u64_or_zero")]
    pub order_count: u64,
    #[serde(rename = "fatturato", default, deserialize_with = "de_f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "clienti_distinti", default, deserialize_with = "de_u64_or_zero")]
    pub distinct_customers: u64,
    #[serde(rename = "clienti_ricorrenti", default, deserialize_with = "de_opt_u64")]
    pub recurring_customers: Option<u64>,
}

/// Revenue by country and source for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAggRow {
    #[serde(rename = "paese", default, deserialize_with = "de_string_or_empty")]
    pub country: String,
    #[serde(rename = "sorgente", default, deserialize_with = "de_string_or_empty")]
    pub source: String,
    #[serde(rename = "fatturato", default, deserialize_with = "de_f64_or_zero")]
    pub revenue: f64,
    #[serde(rename = "ordini", default, deserialize_with = "de_u64_or_zero")]
    pub order_count: u64,
    #[serde(rename = "top_meteo", default)]
    pub top_weather: Option<String>,
}

/// Revenue pre-aggregated per (year, month, country, source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAggRow {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "paese", default, deserialize_with = "de_string_or_empty")]
    pub country: String,
    #[serde(rename = "sorgente", default, deserialize_with = "de_string_or_empty")]
    pub source: String,
    #[serde(rename = "fatturato", default, deserialize_with = "de_f64_or_zero")]
    pub revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> AvailablePeriods {
        AvailablePeriods::new(vec![
            PeriodRow { year: 2024, month: 11 },
            PeriodRow { year: 2023, month: 5 },
            PeriodRow { year: 2025, month: 2 },
            PeriodRow { year: 2024, month: 3 },
        ])
    }

    #[test]
    fn test_years_desc_and_distinct() {
        assert_eq!(periods().years(), vec![2025, 2024, 2023]);
        assert_eq!(periods().earliest_year(), Some(2023));
    }

    #[test]
    fn test_months_in_calendar_order() {
        let months = periods().months_for_year(2024);
        let values: Vec<&str> = months.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["03", "11"]);
        assert_eq!(months[0].label, "March");
    }

    #[test]
    fn test_kpis_row_coerces_strings_and_nulls() {
        let row: KpisRow = serde_json::from_str(
            r#"{"volume_ordini": "12", "fatturato": null, "clienti_distinti": 4}"#,
        )
        .unwrap();
        assert_eq!(row.order_count, 12);
        assert_eq!(row.revenue, 0.0);
        assert_eq!(row.distinct_customers, 4);
        assert_eq!(row.recurring_customers, None);
    }

    #[test]
    fn test_agg_rows_accept_null_country_and_source() {
        let rows: Vec<ChartAggRow> = serde_json::from_str(
            r#"[{"year":2024,"month":1,"paese":null,"sorgente":"web","fatturato":10},
                {"year":2024,"month":2,"paese":"Italia","sorgente":null,"fatturato":"5"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].country, "");
        assert_eq!(rows[0].source, "web");
        assert_eq!(rows[1].source, "");
        assert_eq!(rows[1].revenue, 5.0);

        let agg: Vec<DashboardAggRow> = serde_json::from_str(
            r#"[{"paese":null,"sorgente":null,"fatturato":3,"ordini":1,"top_meteo":null}]"#,
        )
        .unwrap();
        assert_eq!(agg[0].country, "");
        assert_eq!(agg[0].source, "");
    }
}
