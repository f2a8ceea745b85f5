//! HTTP client for the hosted backend: PostgREST tables and RPCs under
//! `/rest/v1`, password auth under `/auth/v1`.
//!
//! One instance is built from [`ClientConfig`] at start-up and handed to the
//! component tree through context (see [`use_client`]).

use contracts::shared::config::ClientConfig;
use contracts::shared::fetch::FetchError;
use contracts::shared::rest_query::TableQuery;
use contracts::system::auth::{AuthUser, RefreshRequest, Session, SignInRequest};
use crate::shared::date_utils::now_unix;
use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct SupabaseClient {
    config: Arc<ClientConfig>,
    access_token: RwSignal<Option<String>>,
}

impl SupabaseClient {
    pub fn new(config: ClientConfig) -> Self {
        if !config.is_complete() {
            log::warn!("Backend URL or anon key missing: remote calls will fail");
        }
        Self {
            config: Arc::new(config),
            access_token: RwSignal::new(None),
        }
    }

    /// Token used for data requests; `None` falls back to the anon key.
    pub fn set_access_token(&self, token: Option<String>) {
        self.access_token.set(token);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    fn authorize(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let bearer = token
            .map(str::to_string)
            .or_else(|| self.access_token.get_untracked())
            .unwrap_or_else(|| self.config.anon_key.clone());
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {}", bearer))
    }

    /// Call a database function.
    pub async fn rpc<P, T>(&self, name: &str, params: &P) -> Result<T, FetchError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.rpc_at(&format!("/rest/v1/rpc/{}", name), params).await
    }

    /// One page (`from..=to`) of a set-returning database function.
    pub async fn rpc_rows_page<P, T>(&self, name: &str, params: &P, from: usize, to: usize) -> Result<Vec<T>, FetchError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let path = format!(
            "/rest/v1/rpc/{}?offset={}&limit={}",
            name,
            from,
            to.saturating_sub(from) + 1
        );
        let rows: Option<Vec<T>> = self.rpc_at(&path, params).await?;
        Ok(rows.unwrap_or_default())
    }

    async fn rpc_at<P, T>(&self, path: &str, params: &P) -> Result<T, FetchError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let request = self
            .authorize(Request::post(&self.url(path)), None)
            .json(params)
            .map_err(|e| FetchError::Decode(format!("Failed to serialize request: {}", e)))?;
        let response = request.send().await.map_err(network_error)?;
        read_json(response).await
    }

    /// Call a database function returning a set of rows; `null` is empty.
    pub async fn rpc_rows<P, T>(&self, name: &str, params: &P) -> Result<Vec<T>, FetchError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let rows: Option<Vec<T>> = self.rpc(name, params).await?;
        Ok(rows.unwrap_or_default())
    }

    /// Call a database function returning at most one row, either as an
    /// object or as a one-element array.
    pub async fn rpc_single<P, T>(&self, name: &str, params: &P) -> Result<Option<T>, FetchError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let value: serde_json::Value = self.rpc(name, params).await?;
        let row = match value {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            serde_json::Value::Array(_) | serde_json::Value::Null => return Ok(None),
            other => other,
        };
        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Read rows from a table.
    pub async fn select<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>, FetchError> {
        let response = self
            .authorize(Request::get(&self.url(&query.to_path())), None)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }

    pub async fn sign_in_with_password(&self, email: String, password: String) -> Result<Session, FetchError> {
        let body = SignInRequest { email, password };
        self.token_request("password", &body).await
    }

    pub async fn refresh_session(&self, refresh_token: String) -> Result<Session, FetchError> {
        let body = RefreshRequest { refresh_token };
        self.token_request("refresh_token", &body).await
    }

    async fn token_request<B: Serialize>(&self, grant_type: &str, body: &B) -> Result<Session, FetchError> {
        let url = self.url(&format!("/auth/v1/token?grant_type={}", grant_type));
        let request = Request::post(&url)
            .header("apikey", &self.config.anon_key)
            .json(body)
            .map_err(|e| FetchError::Decode(format!("Failed to serialize request: {}", e)))?;
        let response = request.send().await.map_err(network_error)?;
        let session: Session = read_json(response).await.map_err(into_auth_error)?;
        Ok(session.with_expiry_from(now_unix()))
    }

    /// Validate an access token and return its user.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, FetchError> {
        let response = self
            .authorize(Request::get(&self.url("/auth/v1/user")), Some(access_token))
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await.map_err(into_auth_error)
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), FetchError> {
        let response = self
            .authorize(Request::post(&self.url("/auth/v1/logout")), Some(access_token))
            .send()
            .await
            .map_err(network_error)?;
        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_response(response.status(), &body));
        }
        Ok(())
    }
}

fn network_error(e: gloo_net::Error) -> FetchError {
    FetchError::Network(format!("Failed to send request: {}", e))
}

fn into_auth_error(e: FetchError) -> FetchError {
    match e {
        FetchError::Http { message, .. } => FetchError::Auth(message),
        other => other,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::from_response(response.status(), &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// The client provided by `App`.
pub fn use_client() -> SupabaseClient {
    use_context::<SupabaseClient>().expect("SupabaseClient not found in context")
}
