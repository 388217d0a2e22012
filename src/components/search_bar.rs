//! Search Bar Component
//!
//! Text input that reports the query once typing pauses.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[component]
pub fn SearchBar(
    #[prop(into)] on_search: Callback<String>,
    debounce_ms: u32,
) -> impl IntoView {
    let (text, set_text) = signal(String::new());
    // Replacing the timeout drops the previous one, which cancels it
    let pending = StoredValue::new_local(None::<Timeout>);

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        set_text.set(value.clone());
        let timeout = Timeout::new(debounce_ms, move || on_search.run(value));
        pending.set_value(Some(timeout));
    };

    let on_clear = move |_: leptos::ev::MouseEvent| {
        pending.set_value(None);
        set_text.set(String::new());
        on_search.run(String::new());
    };

    view! {
        <div class="search-bar">
            <input
                type="search"
                placeholder="Search items..."
                prop:value=move || text.get()
                on:input=on_input
            />
            <Show when=move || !text.with(String::is_empty)>
                <button type="button" class="clear-btn" on:click=on_clear>
                    "Clear"
                </button>
            </Show>
        </div>
    }
}
