//! KPI snapshot and period-over-period deltas.

use super::dto::KpisRow;
use crate::domain::a001_order::aggregate::{OrderRow, StatusCatalog};
use std::collections::HashSet;

/// The four KPI cards, for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KpiSnapshot {
    pub revenue: f64,
    pub order_count: u64,
    pub avg_ticket: f64,
    pub distinct_customers: u64,
    pub recurring_customers: Option<u64>,
}

/// Average ticket; zero when there are no orders.
pub fn average_ticket(revenue: f64, order_count: u64) -> f64 {
    if order_count > 0 {
        revenue / order_count as f64
    } else {
        0.0
    }
}

impl KpiSnapshot {
    /// From the KPI procedure result. An absent row means an empty period.
    pub fn from_row(row: Option<&KpisRow>) -> Self {
        match row {
            Some(row) => Self {
                revenue: row.revenue,
                order_count: row.order_count,
                avg_ticket: average_ticket(row.revenue, row.order_count),
                distinct_customers: row.distinct_customers,
                recurring_customers: row.recurring_customers,
            },
            None => Self::default(),
        }
    }

    /// Computed client-side from raw orders. Only completed orders qualify.
    pub fn from_orders(orders: &[OrderRow], statuses: &StatusCatalog) -> Self {
        let qualifying: Vec<&OrderRow> = orders
            .iter()
            .filter(|o| statuses.is_completed(o.status.as_deref()))
            .collect();
        let revenue: f64 = qualifying.iter().map(|o| o.net_revenue).sum();
        let order_count = qualifying.len() as u64;
        let customers: HashSet<i64> = qualifying.iter().filter_map(|o| o.customer_id).collect();
        Self {
            revenue,
            order_count,
            avg_ticket: average_ticket(revenue, order_count),
            distinct_customers: customers.len() as u64,
            recurring_customers: None,
        }
    }

    /// Value shown on the customers card.
    pub fn customers(&self) -> u64 {
        self.recurring_customers.unwrap_or(self.distinct_customers)
    }
}

/// Percentage change; `None` when the previous value is zero or either side
/// is not a finite number.
pub fn delta(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !current.is_finite() || !previous.is_finite() {
        return None;
    }
    let pct = (current - previous) / previous * 100.0;
    pct.is_finite().then_some(pct)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KpiDeltas {
    pub revenue: Option<f64>,
    pub order_count: Option<f64>,
    pub avg_ticket: Option<f64>,
    pub customers: Option<f64>,
}

impl KpiDeltas {
    /// Deltas of `current` against `previous`. Everything is `None` when the
    /// comparison is not allowed (earliest period) or the previous period
    /// did not load.
    pub fn compute(current: &KpiSnapshot, previous: Option<&KpiSnapshot>, comparison_allowed: bool) -> Self {
        let Some(previous) = previous.filter(|_| comparison_allowed) else {
            return Self::default();
        };
        Self {
            revenue: delta(current.revenue, previous.revenue),
            order_count: delta(current.order_count as f64, previous.order_count as f64),
            avg_ticket: delta(current.avg_ticket, previous.avg_ticket),
            customers: delta(current.customers() as f64, previous.customers() as f64),
        }
    }
}

/// `"+12,3%"`, `"-4,0%"`, or `"–"` when there is nothing to compare.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(pct) => {
            let sign = if pct > 0.0 { "+" } else if pct < 0.0 { "-" } else { "" };
            format!("{}{:.1}%", sign, pct.abs()).replace('.', ",")
        }
        None => "–".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_order::aggregate::OrderStatusRow;

    fn snapshot(revenue: f64, orders: u64, customers: u64) -> KpiSnapshot {
        KpiSnapshot::from_row(Some(&KpisRow {
            order_count: orders,
            revenue,
            distinct_customers: customers,
            recurring_customers: None,
        }))
    }

    #[test]
    fn test_delta_zero_previous_is_none() {
        assert_eq!(delta(100.0, 0.0), None);
        assert_eq!(delta(0.0, 0.0), None);
        assert_eq!(delta(f64::NAN, 10.0), None);
        assert_eq!(delta(150.0, 100.0), Some(50.0));
        assert_eq!(delta(50.0, 200.0), Some(-75.0));
    }

    #[test]
    fn test_avg_ticket_never_divides_by_zero() {
        assert_eq!(snapshot(500.0, 0, 0).avg_ticket, 0.0);
        assert_eq!(snapshot(500.0, 4, 0).avg_ticket, 125.0);
        assert_eq!(KpiSnapshot::from_row(None), KpiSnapshot::default());
    }

    #[test]
    fn test_deltas_suppressed_for_earliest_period() {
        let current = snapshot(200.0, 4, 3);
        let previous = snapshot(100.0, 2, 1);
        let deltas = KpiDeltas::compute(&current, Some(&previous), false);
        assert_eq!(deltas, KpiDeltas::default());
        assert_eq!(format_delta(deltas.revenue), "–");
    }

    #[test]
    fn test_deltas_with_comparison() {
        let current = snapshot(200.0, 4, 3);
        let previous = snapshot(100.0, 2, 0);
        let deltas = KpiDeltas::compute(&current, Some(&previous), true);
        assert_eq!(deltas.revenue, Some(100.0));
        assert_eq!(deltas.order_count, Some(100.0));
        assert_eq!(deltas.avg_ticket, Some(0.0));
        assert_eq!(deltas.customers, None);
        assert_eq!(KpiDeltas::compute(&current, None, true), KpiDeltas::default());
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(Some(12.345)), "+12,3%");
        assert_eq!(format_delta(Some(-83.8)), "-83,8%");
        assert_eq!(format_delta(Some(0.0)), "0,0%");
    }

    fn order(id: i64, status: &str, revenue: f64, customer: Option<i64>) -> OrderRow {
        OrderRow {
            id,
            order_number: None,
            order_date: "2024-01-10".into(),
            status: Some(status.into()),
            net_revenue: revenue,
            euro_revenue: revenue,
            customer_id: customer,
            shop: Some("Shop".into()),
            country: None,
            source: None,
        }
    }

    #[test]
    fn test_from_orders_counts_completed_only() {
        let statuses = StatusCatalog::new(vec![OrderStatusRow {
            id: 1,
            label: "Concluso".into(),
            names: vec!["Spedito".into()],
        }]);
        let orders = vec![
            order(1, "Spedito", 100.0, Some(10)),
            order(2, "spedito", 50.0, Some(10)),
            order(3, "Spedito", 30.0, None),
            order(4, "Annullato", 999.0, Some(11)),
        ];
        let kpi = KpiSnapshot::from_orders(&orders, &statuses);
        assert_eq!(kpi.revenue, 180.0);
        assert_eq!(kpi.order_count, 3);
        assert_eq!(kpi.avg_ticket, 60.0);
        assert_eq!(kpi.distinct_customers, 1);
    }
}
