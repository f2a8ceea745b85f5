use leptos::prelude::*;

/// Row of toggle chips, one per option.
#[component]
pub fn ChipMultiSelect(
    label: &'static str,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    /// Whether the option with this key is selected
    is_selected: Callback<String, bool>,
    on_toggle: Callback<String>,
    /// Select every option
    #[prop(optional)]
    on_all: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="chip-select">
            <span class="chip-select__label">{label}</span>
            <div class="chip-select__chips">
                {on_all.map(|on_all| view! {
                    <button class="chip chip--ghost" on:click=move |_| on_all.run(())>"All"</button>
                })}
                {move || options.get().into_iter().map(|(key, text)| {
                    let selected_key = key.clone();
                    let class = move || if is_selected.run(selected_key.clone()) { "chip chip--active" } else { "chip" };
                    view! {
                        <button class=class on:click=move |_| on_toggle.run(key.clone())>{text}</button>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}
