use contracts::shared::config::ClientConfig;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built frontend bundle
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

/// Hosted backend the browser talks to directly
#[derive(Debug, Deserialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            supabase_url: self.supabase.url.clone(),
            anon_key: self.supabase.anon_key.clone(),
        }
    }

    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` win over the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SUPABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.supabase.url = url;
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY").filter(|v| !v.trim().is_empty()) {
            self.supabase.anon_key = key;
        }
    }

    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.static_dir)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[supabase]
url = "http://127.0.0.1:54321"
anon_key = ""
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment overrides are applied last.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    if config.supabase.anon_key.trim().is_empty() {
        tracing::warn!("Supabase anon key is empty: set SUPABASE_ANON_KEY or config.toml");
    }
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.supabase.url, "http://127.0.0.1:54321");
    }

    #[test]
    fn test_server_section_is_optional() {
        let config: Config = toml::from_str(
            r#"
            [supabase]
            url = "https://abc.supabase.co"
            anon_key = "key"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.client_config().is_complete());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        config.apply_env_overrides(|name| match name {
            "SUPABASE_URL" => Some("https://xyz.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.supabase.url, "https://xyz.supabase.co");
        assert_eq!(config.supabase.anon_key, "");
    }
}
