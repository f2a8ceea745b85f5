use serde::{Deserialize, Serialize};

/// Runtime settings the browser client needs to reach the hosted backend.
/// Served by the host at `GET /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub supabase_url: String,
    pub anon_key: String,
}

impl ClientConfig {
    pub fn is_complete(&self) -> bool {
        !self.supabase_url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.supabase_url.trim().trim_end_matches('/')
    }
}
