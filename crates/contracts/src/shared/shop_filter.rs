//! Shop matching rules shared by every order query.
//!
//! The database filter is a case-insensitive `ILIKE '%shop%'` and is only a
//! coarse pre-filter: a row is accepted client-side when its trimmed,
//! lower-cased shop equals the trimmed, lower-cased selection. Rows with a
//! `NULL` shop never match.

/// Canonical comparison form of a shop name.
pub fn normalize_shop(shop: &str) -> String {
    shop.trim().to_lowercase()
}

/// Exact, case- and whitespace-insensitive shop equality.
pub fn shop_matches(row_shop: Option<&str>, selected_shop: &str) -> bool {
    match row_shop {
        Some(shop) => normalize_shop(shop) == normalize_shop(selected_shop),
        None => false,
    }
}

/// Escape the LIKE metacharacters (`\`, `%`, `_`) so they match literally.
pub fn escape_for_ilike(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Substring pattern used for the server-side `ILIKE` pre-filter.
pub fn shop_ilike_pattern(selected_shop: &str) -> String {
    format!("%{}%", escape_for_ilike(selected_shop.trim()))
}

/// Keep only the rows whose shop matches the selection exactly.
pub fn retain_shop<T>(rows: &mut Vec<T>, selected_shop: &str, shop_of: impl Fn(&T) -> Option<&str>) {
    rows.retain(|row| shop_matches(shop_of(row), selected_shop));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_space_and_case_match() {
        assert!(shop_matches(Some(" myshop"), "MyShop "));
        assert!(shop_matches(Some("MYSHOP"), "myshop"));
    }

    #[test]
    fn test_substring_is_not_a_match() {
        assert!(!shop_matches(Some("MyShop2"), "MyShop"));
        assert!(!shop_matches(Some("The MyShop"), "MyShop"));
        assert!(!shop_matches(None, "MyShop"));
    }

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape_for_ilike("50%_off"), "50\\%\\_off");
        assert_eq!(escape_for_ilike("a\\b"), "a\\\\b");
        assert_eq!(escape_for_ilike("plain"), "plain");
    }

    #[test]
    fn test_pattern_trims_and_wraps() {
        assert_eq!(shop_ilike_pattern("  My_Shop% "), "%My\\_Shop\\%%");
    }

    #[test]
    fn test_retain_shop_drops_pattern_false_positives() {
        let mut rows = vec![
            Some("MyShop".to_string()),
            Some("MyShop2".to_string()),
            Some(" myshop ".to_string()),
            None,
        ];
        retain_shop(&mut rows, "MyShop ", |r| r.as_deref());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_literal_percent_shop_only_matches_itself() {
        let selected = "100%_Bio";
        let mut rows = vec![
            Some("100%_bio".to_string()),
            Some("100XYBio".to_string()),
            Some("100%_Bio Outlet".to_string()),
        ];
        retain_shop(&mut rows, selected, |r| r.as_deref());
        assert_eq!(rows, vec![Some("100%_bio".to_string())]);
        assert_eq!(shop_ilike_pattern(selected), "%100\\%\\_Bio%");
    }
}
