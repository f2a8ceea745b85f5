use crate::shared::numeric::de_vec_or_empty;
use serde::{Deserialize, Serialize};

pub const PROFILES_TABLE: &str = "profili";
pub const PROFILE_COLUMNS: &str = "id, shops_abilitati, nome, logo_url";

/// Prefix of the browser-storage key remembering the selected shop.
pub const SELECTED_SHOP_KEY_PREFIX: &str = "piano-selected-shop";

/// The signed-in user's profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(rename = "shops_abilitati", default, deserialize_with = "de_vec_or_empty")]
    pub enabled_shops: Vec<String>,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Profile {
    pub fn has_multiple_shops(&self) -> bool {
        self.enabled_shops.len() > 1
    }
}

pub fn selected_shop_storage_key(user_id: &str) -> String {
    format!("{}-{}", SELECTED_SHOP_KEY_PREFIX, user_id)
}

/// Shop to select after the profile loads: the remembered one if it is still
/// enabled, otherwise the first enabled shop.
pub fn resolve_initial_shop(enabled_shops: &[String], stored: Option<&str>) -> Option<String> {
    match stored {
        Some(s) if enabled_shops.iter().any(|shop| shop == s) => Some(s.to_string()),
        _ => enabled_shops.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shops() -> Vec<String> {
        vec!["Alpha".to_string(), "Beta".to_string()]
    }

    #[test]
    fn test_stored_shop_is_restored() {
        assert_eq!(resolve_initial_shop(&shops(), Some("Beta")), Some("Beta".into()));
    }

    #[test]
    fn test_stale_stored_shop_falls_back_to_first() {
        assert_eq!(resolve_initial_shop(&shops(), Some("Gamma")), Some("Alpha".into()));
        assert_eq!(resolve_initial_shop(&shops(), None), Some("Alpha".into()));
    }

    #[test]
    fn test_no_enabled_shops() {
        assert_eq!(resolve_initial_shop(&[], Some("Alpha")), None);
    }

    #[test]
    fn test_storage_key_is_namespaced() {
        assert_eq!(selected_shop_storage_key("u-1"), "piano-selected-shop-u-1");
    }

    #[test]
    fn test_profile_parses_wire_names() {
        let p: Profile = serde_json::from_str(
            r#"{"id":"u-1","shops_abilitati":["A","B"],"nome":null,"logo_url":null}"#,
        )
        .unwrap();
        assert!(p.has_multiple_shops());
        assert_eq!(p.name, None);
    }

    #[test]
    fn test_profile_with_null_shops_has_none_enabled() {
        let p: Profile = serde_json::from_str(
            r#"{"id":"u-1","shops_abilitati":null,"nome":"Anna","logo_url":null}"#,
        )
        .unwrap();
        assert!(p.enabled_shops.is_empty());
        assert_eq!(resolve_initial_shop(&p.enabled_shops, Some("Alpha")), None);
    }
}
