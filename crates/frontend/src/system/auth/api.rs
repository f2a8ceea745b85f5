use contracts::shared::fetch::FetchError;
use contracts::system::auth::Session;

use super::storage;
use crate::shared::supabase::SupabaseClient;

pub async fn sign_in(client: &SupabaseClient, email: String, password: String) -> Result<Session, FetchError> {
    let session = client.sign_in_with_password(email, password).await?;
    storage::save_session(&session);
    Ok(session)
}

/// Bring back the stored session: validate its access token, refresh it when
/// rejected or of unknown age. Anything unusable is cleared.
pub async fn restore_session(client: &SupabaseClient) -> Option<Session> {
    let stored = storage::load_session()?;

    // Without a known expiry the token cannot be scheduled for refresh, so
    // trade it for a fresh one straight away.
    if stored.expires_at.is_some() {
        match client.get_user(&stored.access_token).await {
            Ok(user) => {
                let session = Session { user, ..stored };
                storage::save_session(&session);
                return Some(session);
            }
            Err(e) => log::info!("Stored access token rejected ({}), refreshing", e),
        }
    }

    match refresh(client, stored.refresh_token).await {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Session refresh failed: {}", e);
            storage::clear_session();
            None
        }
    }
}

/// Exchange the refresh token for a new session and persist it.
pub async fn refresh(client: &SupabaseClient, refresh_token: String) -> Result<Session, FetchError> {
    let session = client.refresh_session(refresh_token).await?;
    storage::save_session(&session);
    Ok(session)
}

/// Revoke the session server-side; local state is cleared regardless.
pub async fn sign_out(client: &SupabaseClient, access_token: &str) {
    if let Err(e) = client.sign_out(access_token).await {
        log::warn!("Sign-out request failed: {}", e);
    }
    storage::clear_session();
}
