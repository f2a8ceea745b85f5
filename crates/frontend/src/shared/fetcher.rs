//! Reactive wrapper around one remote fetcher.
//!
//! The fetcher re-runs whenever its key changes. A `None` key resets it to
//! `Idle` without a request. Responses that arrive after a newer key took
//! over are dropped.

use contracts::shared::fetch::{FetchError, FetchGeneration, FetchState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

pub fn use_fetch<K, T, F, Fut>(name: &'static str, key: Memo<Option<K>>, fetch: F) -> RwSignal<FetchState<T>>
where
    K: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: Fn(K) -> Fut + Clone + 'static,
    Fut: Future<Output = Result<T, FetchError>> + 'static,
{
    let state = RwSignal::new(FetchState::Idle);
    let generation = FetchGeneration::default();

    Effect::new(move |_| {
        let Some(params) = key.get() else {
            generation.invalidate();
            state.set(FetchState::Idle);
            return;
        };

        let ticket = generation.begin();
        state.set(FetchState::Loading);
        log::debug!("{}: fetching {:?}", name, params);

        let fetch = fetch.clone();
        spawn_local(async move {
            let result = fetch(params).await;
            if !ticket.is_current() {
                log::debug!("{}: discarding superseded response", name);
                return;
            }
            if let Err(e) = &result {
                log::error!("{}: {}", name, e);
            }
            state.set(FetchState::settle(result));
        });
    });

    state
}
