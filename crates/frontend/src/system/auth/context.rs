use contracts::shared::fetch::{FetchError, FetchGeneration, FetchTicket};
use contracts::system::auth::{AuthUser, Session};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};
use crate::shared::date_utils::now_unix;
use crate::shared::supabase::{use_client, SupabaseClient};

/// Wait before retrying a refresh that failed for a non-auth reason.
const REFRESH_RETRY_SECS: u64 = 30;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub session: Option<Session>,
    /// True until the stored session has been checked.
    pub restoring: bool,
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let client = use_client();
    let (auth_state, set_auth_state) = signal(AuthState {
        session: None,
        restoring: true,
    });

    let restore_client = client.clone();
    Effect::new(move |_| {
        let client = restore_client.clone();
        spawn_local(async move {
            let session = api::restore_session(&client).await;
            if let Some(s) = &session {
                log::info!("Session restored for {}", s.user.id);
            }
            apply_session(&client, set_auth_state, session);
        });
    });

    // Every session change reschedules the refresh; the previous timer's
    // ticket goes stale and its result is dropped.
    let refresh_generation = FetchGeneration::default();
    Effect::new(move |_| {
        let ticket = refresh_generation.begin();
        let Some(session) = auth_state.with(|s| s.session.clone()) else {
            return;
        };
        let Some(delay) = session.refresh_delay_secs(now_unix()) else {
            log::warn!("Session has no expiry, automatic refresh disabled");
            return;
        };
        let client = client.clone();
        spawn_local(keep_session_fresh(client, set_auth_state, ticket, session.refresh_token, delay));
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

async fn keep_session_fresh(
    client: SupabaseClient,
    set_auth_state: WriteSignal<AuthState>,
    ticket: FetchTicket,
    refresh_token: String,
    mut delay_secs: u64,
) {
    loop {
        sleep_secs(delay_secs).await;
        if !ticket.is_current() {
            return;
        }
        match api::refresh(&client, refresh_token.clone()).await {
            Ok(session) if ticket.is_current() => {
                log::debug!("Access token refreshed for {}", session.user.id);
                apply_session(&client, set_auth_state, Some(session));
                return;
            }
            Ok(_) => return,
            Err(e) if e.is_unauthorized() => {
                log::warn!("Session expired and could not be refreshed: {}", e);
                if ticket.is_current() {
                    storage::clear_session();
                    apply_session(&client, set_auth_state, None);
                }
                return;
            }
            Err(e) => {
                log::warn!("Token refresh failed, retrying in {}s: {}", REFRESH_RETRY_SECS, e);
                delay_secs = REFRESH_RETRY_SECS;
            }
        }
    }
}

async fn sleep_secs(secs: u64) {
    let millis = secs.saturating_mul(1000).min(i32::MAX as u64) as u32;
    TimeoutFuture::new(millis).await;
}

fn apply_session(client: &SupabaseClient, set_auth_state: WriteSignal<AuthState>, session: Option<Session>) {
    client.set_access_token(session.as_ref().map(|s| s.access_token.clone()));
    set_auth_state.set(AuthState {
        session,
        restoring: false,
    });
}

pub async fn do_login(
    client: SupabaseClient,
    set_auth_state: WriteSignal<AuthState>,
    email: String,
    password: String,
) -> Result<(), FetchError> {
    let session = api::sign_in(&client, email, password).await?;
    log::info!("Signed in as {}", session.user.id);
    apply_session(&client, set_auth_state, Some(session));
    Ok(())
}

pub async fn do_logout(client: SupabaseClient, auth_state: ReadSignal<AuthState>, set_auth_state: WriteSignal<AuthState>) {
    let token = auth_state.with_untracked(|s| s.session.as_ref().map(|s| s.access_token.clone()));
    if let Some(token) = token {
        api::sign_out(&client, &token).await;
    }
    apply_session(&client, set_auth_state, None);
}
