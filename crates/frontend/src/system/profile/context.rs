//! Profile and shop scope of the signed-in user.
//!
//! Owns the app-wide [`SelectionState`]: the selected shop lives there so
//! that switching shop resets every filter that depends on it.

use contracts::dashboards::d410_sales_overview::selection::SelectionState;
use contracts::shared::fetch::FetchState;
use contracts::system::profile::{resolve_initial_shop, Profile};
use leptos::prelude::*;

use super::{api, storage};
use crate::shared::fetcher::use_fetch;
use crate::shared::supabase::use_client;
use crate::system::auth::context::use_auth;

#[derive(Clone, Copy)]
pub struct ProfileContext {
    pub profile: RwSignal<FetchState<Option<Profile>>>,
    pub selection: RwSignal<SelectionState>,
    user_id: Memo<Option<String>>,
}

impl ProfileContext {
    pub fn enabled_shops(&self) -> Vec<String> {
        self.profile.with(|p| {
            p.data()
                .and_then(|p| p.as_ref())
                .map(|p| p.enabled_shops.clone())
                .unwrap_or_default()
        })
    }

    pub fn selected_shop(&self) -> Option<String> {
        self.selection.with(|s| s.shop().map(str::to_string))
    }

    /// User-driven shop switch; remembered per user.
    pub fn select_shop(&self, shop: String) {
        if let Some(user_id) = self.user_id.get_untracked() {
            storage::save_selected_shop(&user_id, &shop);
        }
        log::info!("Shop selected: {}", shop);
        self.selection.update(|s| s.select_shop(Some(shop)));
    }
}

#[component]
pub fn ProfileProvider(children: ChildrenFn) -> impl IntoView {
    let client = use_client();
    let (auth_state, _) = use_auth();

    let user_id = Memo::new(move |_| auth_state.with(|s| s.user().map(|u| u.id.clone())));
    let profile = use_fetch("profile", user_id, move |id| api::fetch_profile(client.clone(), id));
    let selection = RwSignal::new(SelectionState::default());

    // Initial shop once the profile settles: remembered shop if still enabled.
    Effect::new(move |_| {
        let Some(uid) = user_id.get() else {
            selection.set(SelectionState::default());
            return;
        };
        let shops = profile.with(|p| match p {
            FetchState::Ready(Some(p)) => Some(p.enabled_shops.clone()),
            FetchState::Ready(None) => Some(Vec::new()),
            _ => None,
        });
        let Some(shops) = shops else {
            return;
        };
        let stored = storage::load_selected_shop(&uid);
        let shop = resolve_initial_shop(&shops, stored.as_deref());
        if shop.is_none() {
            log::warn!("No shop enabled for user {}", uid);
        }
        selection.update(|s| s.select_shop(shop));
    });

    provide_context(ProfileContext {
        profile,
        selection,
        user_id,
    });

    children()
}

pub fn use_profile() -> ProfileContext {
    use_context::<ProfileContext>().expect("ProfileProvider not found in component tree")
}
