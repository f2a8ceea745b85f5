use crate::dashboards::d410_sales_overview::ui::dashboard::SalesOverviewDashboard;
use crate::domain::a001_order::ui::list::OrdersList;
use crate::layout::global_context::{AppGlobalContext, Page};
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use crate::system::profile::context::ProfileProvider;
use leptos::prelude::*;
use thaw::*;

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    ctx.init_router_integration();

    view! {
        <ProfileProvider>
            <Shell center=move || match ctx.active.get() {
                Page::Dashboard => view! { <SalesOverviewDashboard /> }.into_any(),
                Page::Orders => view! { <OrdersList /> }.into_any(),
            } />
        </ProfileProvider>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || !auth_state.with(|s| s.restoring)
            fallback=|| view! {
                <Flex gap=FlexGap::Small style="align-items: center; justify-content: center; height: 100vh;">
                    <Spinner />
                </Flex>
            }
        >
            <Show
                when=move || auth_state.with(|s| s.is_authenticated())
                fallback=|| view! { <LoginPage /> }
            >
                <MainLayout />
            </Show>
        </Show>
    }
}
