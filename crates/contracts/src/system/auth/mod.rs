use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Session returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds at which the access token stops being accepted.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: AuthUser,
}

/// Refresh this many seconds before the access token expires.
pub const REFRESH_MARGIN_SECS: i64 = 60;

impl Session {
    /// Fill `expires_at` from `expires_in` when the server sent only the latter.
    pub fn with_expiry_from(mut self, now: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now + secs);
        }
        self
    }

    /// Seconds to wait before refreshing, `0` when already due. `None` when
    /// the expiry is unknown.
    pub fn refresh_delay_secs(&self, now: i64) -> Option<u64> {
        let expires_at = self.expires_at?;
        Some((expires_at - REFRESH_MARGIN_SECS - now).max(0) as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        self.user_metadata
            .full_name
            .clone()
            .or_else(|| self.user_metadata.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "User".to_string())
    }

    /// Avatar letter: first character of the email, upper-cased.
    pub fn initial(&self) -> char {
        self.email
            .as_deref()
            .and_then(|e| e.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_parses_token_response() {
        let json = r#"{
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt",
            "user": {"id": "u-1", "email": "anna@shop.it", "user_metadata": {"full_name": "Anna"}}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.user.display_name(), "Anna");
        assert_eq!(session.user.initial(), 'A');
    }

    #[test]
    fn test_display_name_fallbacks() {
        let user = AuthUser {
            id: "u".into(),
            email: None,
            user_metadata: UserMetadata::default(),
        };
        assert_eq!(user.display_name(), "User");
        assert_eq!(user.initial(), 'U');
    }

    fn session(expires_in: Option<i64>, expires_at: Option<i64>) -> Session {
        Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_in,
            expires_at,
            token_type: None,
            user: AuthUser {
                id: "u-1".into(),
                email: None,
                user_metadata: UserMetadata::default(),
            },
        }
    }

    #[test]
    fn test_expiry_is_stamped_from_expires_in() {
        let s = session(Some(3600), None).with_expiry_from(1_000);
        assert_eq!(s.expires_at, Some(4_600));

        let s = session(Some(3600), Some(2_000)).with_expiry_from(1_000);
        assert_eq!(s.expires_at, Some(2_000));

        assert_eq!(session(None, None).with_expiry_from(1_000).expires_at, None);
    }

    #[test]
    fn test_refresh_is_scheduled_before_expiry() {
        let s = session(Some(3600), None).with_expiry_from(1_000);
        assert_eq!(s.refresh_delay_secs(1_000), Some(3540));
        assert_eq!(s.refresh_delay_secs(4_560), Some(0));
        assert_eq!(s.refresh_delay_secs(9_999), Some(0));
        assert_eq!(session(None, None).refresh_delay_secs(1_000), None);
    }

    #[test]
    fn test_stored_session_without_expiry_still_parses() {
        let json = r#"{"access_token":"at","refresh_token":"rt","user":{"id":"u-1"}}"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.expires_at, None);
    }
}
