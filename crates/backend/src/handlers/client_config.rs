use axum::extract::State;
use axum::Json;
use contracts::shared::config::ClientConfig;

use crate::AppState;

/// GET /api/config
///
/// The anon key is a public client key; RLS on the hosted backend does the
/// authorization.
pub async fn get(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.config.client_config())
}
