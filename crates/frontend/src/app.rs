use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::api_utils::fetch_client_config;
use crate::shared::supabase::SupabaseClient;
use crate::system::auth::context::AuthProvider;
use contracts::shared::fetch::FetchState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());

    let config = RwSignal::new(FetchState::Loading);
    spawn_local(async move {
        let result = fetch_client_config().await;
        if let Err(e) = &result {
            log::error!("Failed to load client configuration: {}", e);
        }
        config.set(FetchState::settle(result));
    });

    view! {
        <ConfigProvider>
            {move || match config.get() {
                FetchState::Ready(cfg) => {
                    provide_context(SupabaseClient::new(cfg));
                    view! {
                        <AuthProvider>
                            <AppRoutes />
                        </AuthProvider>
                    }.into_any()
                }
                FetchState::Failed(msg) => view! {
                    <div class="alert alert--error">{format!("Configuration unavailable: {}", msg)}</div>
                }.into_any(),
                FetchState::Idle | FetchState::Loading => view! {
                    <Flex gap=FlexGap::Small style="align-items: center; justify-content: center; height: 100vh;">
                        <Spinner />
                    </Flex>
                }.into_any(),
            }}
        </ConfigProvider>
    }
}
