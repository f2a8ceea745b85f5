//! Number formatting for cards, tables and chart labels (Italian style:
//! `.` groups thousands, `,` separates decimals).

/// Formats a number with `.` thousands separators and `decimals` digits after
/// a `,`, e.g. `1234.567` with 2 decimals gives `"1.234,57"`.
pub fn format_number_with_decimals(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let mut result: String = grouped.chars().rev().collect();

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        result.insert(0, '-');
    }
    match decimal_part {
        Some(d) => format!("{},{}", result, d),
        None => result,
    }
}

/// Currency amount with two decimals: `1.234,56 €`.
pub fn format_euro(value: f64) -> String {
    format!("{} €", format_number_with_decimals(value, 2))
}

/// Integer count with thousands separators.
pub fn format_number_int(value: f64) -> String {
    format_number_with_decimals(value, 0)
}

/// Y-axis label: `€0`, `€N` below a thousand, `€Nk` above.
pub fn format_axis_euro(value: f64) -> String {
    if value == 0.0 {
        "€0".to_string()
    } else if value.abs() < 1000.0 {
        format!("€{}", value.round())
    } else {
        format!("€{}k", (value / 1000.0).round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(1234.56), "1.234,56 €");
        assert_eq!(format_euro(1234567.891), "1.234.567,89 €");
        assert_eq!(format_euro(0.0), "0,00 €");
        assert_eq!(format_euro(-1234.5), "-1.234,50 €");
    }

    #[test]
    fn test_format_number_with_decimals() {
        assert_eq!(format_number_with_decimals(1234.567, 0), "1.235");
        assert_eq!(format_number_with_decimals(1234.567, 1), "1.234,6");
        assert_eq!(format_number_with_decimals(999.0, 0), "999");
        assert_eq!(format_number_with_decimals(-0.001, 2), "0,00");
    }

    #[test]
    fn test_format_number_int() {
        assert_eq!(format_number_int(1234567.0), "1.234.567");
        assert_eq!(format_number_int(f64::NAN), "0");
    }

    #[test]
    fn test_format_axis_euro() {
        assert_eq!(format_axis_euro(0.0), "€0");
        assert_eq!(format_axis_euro(500.0), "€500");
        assert_eq!(format_axis_euro(12_500.0), "€13k");
        assert_eq!(format_axis_euro(250_000.0), "€250k");
    }
}
