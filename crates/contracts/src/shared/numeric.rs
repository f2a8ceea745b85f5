//! Lenient coercion for rows coming from the remote database.
//!
//! PostgREST serialises `numeric` columns either as JSON numbers or as
//! strings, and nullable columns as `null`. Every revenue/count field read
//! from the wire goes through these helpers so that a missing or malformed
//! value becomes `0` instead of an error or a NaN. Nullable text and array
//! columns decode to empty values the same way.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value to a finite `f64`, defaulting to `0.0`.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Coerce an arbitrary JSON value to a non-negative count, defaulting to `0`.
pub fn coerce_u64(value: &Value) -> u64 {
    let v = coerce_f64(value);
    if v <= 0.0 {
        0
    } else {
        v.round() as u64
    }
}

/// `deserialize_with` adapter for revenue-like fields.
pub fn de_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_f64).unwrap_or(0.0))
}

/// `deserialize_with` adapter for count-like fields.
pub fn de_u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_u64).unwrap_or(0))
}

/// Like [`de_u64_or_zero`] but keeps `null` distinguishable from zero.
pub fn de_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_u64(&v)),
    })
}

/// `deserialize_with` adapter for nullable text columns: `null` becomes `""`.
pub fn de_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `deserialize_with` adapter for nullable array columns: `null` becomes `[]`.
pub fn de_vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_numbers_and_strings() {
        assert_eq!(coerce_f64(&json!(12.5)), 12.5);
        assert_eq!(coerce_f64(&json!("1234.50")), 1234.5);
        assert_eq!(coerce_f64(&json!(" 7 ")), 7.0);
    }

    #[test]
    fn test_coerce_invalid_defaults_to_zero() {
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!("n/a")), 0.0);
        assert_eq!(coerce_f64(&json!("NaN")), 0.0);
        assert_eq!(coerce_f64(&json!("inf")), 0.0);
        assert_eq!(coerce_f64(&json!([1, 2])), 0.0);
        assert_eq!(coerce_u64(&json!(-3)), 0);
        assert_eq!(coerce_u64(&json!("42")), 42);
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "de_f64_or_zero")]
        revenue: f64,
        #[serde(default, deserialize_with = "de_opt_u64")]
        recurring: Option<u64>,
    }

    #[test]
    fn test_deserialize_adapters() {
        let row: Row = serde_json::from_str(r#"{"revenue": null, "recurring": null}"#).unwrap();
        assert_eq!(row.revenue, 0.0);
        assert_eq!(row.recurring, None);

        let row: Row = serde_json::from_str(r#"{"revenue": "99.9", "recurring": "3"}"#).unwrap();
        assert_eq!(row.revenue, 99.9);
        assert_eq!(row.recurring, Some(3));

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.revenue, 0.0);
        assert_eq!(row.recurring, None);
    }

    #[derive(Deserialize)]
    struct TextRow {
        #[serde(default, deserialize_with = "de_string_or_empty")]
        country: String,
        #[serde(default, deserialize_with = "de_vec_or_empty")]
        shops: Vec<String>,
    }

    #[test]
    fn test_null_text_and_arrays_become_empty() {
        let row: TextRow = serde_json::from_str(r#"{"country": null, "shops": null}"#).unwrap();
        assert_eq!(row.country, "");
        assert!(row.shops.is_empty());

        let row: TextRow = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.country, "");
        assert!(row.shops.is_empty());

        let row: TextRow =
            serde_json::from_str(r#"{"country": "Italia", "shops": ["a", "b"]}"#).unwrap();
        assert_eq!(row.country, "Italia");
        assert_eq!(row.shops, vec!["a", "b"]);
    }
}
