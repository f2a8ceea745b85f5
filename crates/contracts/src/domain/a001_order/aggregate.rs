use crate::shared::numeric::{de_f64_or_zero, de_string_or_empty, de_vec_or_empty};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Table holding one row per order.
pub const ORDERS_TABLE: &str = "ordini";

/// Columns read for charts, KPIs and the orders list.
pub const ORDER_COLUMNS: &str =
    "id, id_ordine, data_ordine, stato_ordine, totale_tasse_escluse, conversione_euro, id_cliente, shop, stato, gestione";

/// Table mapping raw order statuses to status labels.
pub const ORDER_STATUS_TABLE: &str = "stati_ordini";

/// Status label of orders that count towards revenue.
pub const COMPLETED_LABEL: &str = "Concluso";

/// One order row as exposed by the backend (RLS already limits it to the
/// user's shops).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: i64,
    #[serde(rename = "id_ordine", default)]
    pub order_number: Option<i64>,
    /// `YYYY-MM-DD`
    #[serde(rename = "data_ordine")]
    pub order_date: String,
    #[serde(rename = "stato_ordine", default)]
    pub status: Option<String>,
    /// Revenue net of taxes, in the order currency.
    #[serde(rename = "totale_tasse_escluse", default, deserialize_with = "de_f64_or_zero")]
    pub net_revenue: f64,
    /// Revenue converted to euro.
    #[serde(rename = "conversione_euro", default, deserialize_with = "de_f64_or_zero")]
    pub euro_revenue: f64,
    #[serde(rename = "id_cliente", default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(rename = "stato", default)]
    pub country: Option<String>,
    #[serde(rename = "gestione", default)]
    pub source: Option<String>,
}

impl OrderRow {
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.order_date.split('T').next().unwrap_or(&self.order_date);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// One row of the status table: a label and the raw statuses it groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusRow {
    pub id: i64,
    #[serde(rename = "label_stati", default, deserialize_with = "de_string_or_empty")]
    pub label: String,
    #[serde(rename = "nomi_stati", default, deserialize_with = "de_vec_or_empty")]
    pub names: Vec<String>,
}

/// Lookup from raw order status to its label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusCatalog {
    rows: Vec<OrderStatusRow>,
}

impl StatusCatalog {
    pub fn new(rows: Vec<OrderStatusRow>) -> Self {
        Self { rows }
    }

    pub fn label_of(&self, status: Option<&str>) -> Option<&str> {
        let status = status?.trim();
        if status.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row.names.iter().any(|name| name.trim().eq_ignore_ascii_case(status)))
            .map(|row| row.label.as_str())
    }

    /// Whether the order counts as completed.
    pub fn is_completed(&self, status: Option<&str>) -> bool {
        self.label_of(status) == Some(COMPLETED_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StatusCatalog {
        StatusCatalog::new(vec![
            OrderStatusRow {
                id: 1,
                label: "Concluso".into(),
                names: vec!["Spedito".into(), "Consegnato".into()],
            },
            OrderStatusRow {
                id: 2,
                label: "Annullato".into(),
                names: vec!["Annullato".into(), "Rimborsato".into()],
            },
        ])
    }

    #[test]
    fn test_status_lookup_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(catalog.label_of(Some("SPEDITO")), Some("Concluso"));
        assert!(catalog.is_completed(Some("consegnato ")));
        assert!(!catalog.is_completed(Some("Rimborsato")));
        assert!(!catalog.is_completed(Some("Sconosciuto")));
        assert!(!catalog.is_completed(None));
    }

    #[test]
    fn test_order_row_tolerates_nulls() {
        let json = r#"{
            "id": 7,
            "data_ordine": "2024-03-05",
            "totale_tasse_escluse": null,
            "conversione_euro": "12.40",
            "id_cliente": null,
            "shop": " MyShop"
        }"#;
        let row: OrderRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.net_revenue, 0.0);
        assert_eq!(row.euro_revenue, 12.4);
        assert_eq!(row.customer_id, None);
        assert_eq!(row.date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_status_row_tolerates_nulls() {
        let row: OrderStatusRow =
            serde_json::from_str(r#"{"id": 3, "label_stati": null, "nomi_stati": null}"#).unwrap();
        assert_eq!(row.label, "");
        assert!(row.names.is_empty());
        assert_eq!(StatusCatalog::new(vec![row]).label_of(Some("Spedito")), None);
    }
}
