//! Helpers for talking to the host that served the bundle.

use contracts::shared::config::ClientConfig;
use contracts::shared::fetch::FetchError;
use gloo_net::http::Request;

/// Get the base URL of the host
///
/// The host listens on port 3000 on the same hostname the page was loaded
/// from.
///
/// # Returns
/// - Base URL like "http://localhost:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full host URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Runtime configuration published by the host.
pub async fn fetch_client_config() -> Result<ClientConfig, FetchError> {
    let response = Request::get(&api_url("/api/config"))
        .send()
        .await
        .map_err(|e| FetchError::Network(format!("Failed to send request: {}", e)))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::from_response(response.status(), &body));
    }

    response
        .json::<ClientConfig>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}
