//! TopHeader component - application top navigation bar.
//!
//! Contains:
//! - Brand (profile logo or name)
//! - Page navigation
//! - Shop selector, shown only when more than one shop is enabled
//! - Account menu with sign-out

use crate::layout::global_context::{AppGlobalContext, Page};
use crate::shared::icons::icon;
use crate::shared::supabase::use_client;
use crate::system::auth::context::{do_logout, use_auth};
use crate::system::profile::context::use_profile;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, set_auth_state) = use_auth();
    let profile = use_profile();
    let client = use_client();

    let menu_open = RwSignal::new(false);

    let logout = move |_| {
        let client = client.clone();
        menu_open.set(false);
        spawn_local(async move {
            do_logout(client, auth_state, set_auth_state).await;
        });
    };

    let brand = move || {
        profile.profile.with(|p| {
            let p = p.data().and_then(|p| p.as_ref());
            match (p.and_then(|p| p.logo_url.clone()), p.and_then(|p| p.name.clone())) {
                (Some(logo), name) => view! {
                    <img class="top-header__logo" src=logo alt=name.unwrap_or_default() />
                }
                .into_any(),
                (None, Some(name)) => view! { <span class="top-header__title">{name}</span> }.into_any(),
                (None, None) => view! { <span class="top-header__title">"Sales Analytics"</span> }.into_any(),
            }
        })
    };

    let nav = Page::ALL
        .into_iter()
        .map(|page| {
            let class = move || {
                if ctx.active.get() == page {
                    "top-header__nav-item top-header__nav-item--active"
                } else {
                    "top-header__nav-item"
                }
            };
            view! {
                <button class=class on:click=move |_| ctx.open(page)>
                    {icon(if page == Page::Dashboard { "dashboard" } else { "orders" })}
                    <span>{page.title()}</span>
                </button>
            }
        })
        .collect_view();

    let shop_selector = move || {
        let shops = profile.enabled_shops();
        (shops.len() > 1).then(|| {
            let current = profile.selected_shop().unwrap_or_default();
            view! {
                <div class="top-header__shop">
                    {icon("store")}
                    <select on:change=move |ev| profile.select_shop(event_target_value(&ev))>
                        {shops.into_iter().map(|shop| {
                            let selected = shop == current;
                            view! { <option value=shop.clone() selected=selected>{shop.clone()}</option> }
                        }).collect_view()}
                    </select>
                </div>
            }
        })
    };

    let user = move || auth_state.with(|s| s.user().cloned());

    view! {
        <div class="top-header">
            <div class="top-header__brand">{brand}</div>

            <nav class="top-header__nav">{nav}</nav>

            <div class="top-header__actions">
                {shop_selector}

                <div class="top-header__user">
                    <button class="top-header__avatar" on:click=move |_| menu_open.update(|v| *v = !*v)>
                        {move || user().map(|u| u.initial().to_string()).unwrap_or_default()}
                        {icon("chevron-down")}
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="top-header__menu">
                            <div class="top-header__menu-name">
                                {move || user().map(|u| u.display_name()).unwrap_or_default()}
                            </div>
                            <div class="top-header__menu-email">
                                {move || user().and_then(|u| u.email).unwrap_or_default()}
                            </div>
                            <button class="top-header__menu-item" on:click=logout.clone()>
                                {icon("log-out")}
                                <span>"Sign out"</span>
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}
