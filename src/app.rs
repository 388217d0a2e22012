//! Item Board App
//!
//! Root component: search header, item list, edit dialog and live updates.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::actions;
use crate::api::EventSubscription;
use crate::components::{DialogMode, ItemDialog, ItemList, SearchBar};
use crate::config::AppConfig;
use crate::context::ItemsContext;
use crate::models::Item;
use crate::store::{
    store_apply_event, store_clear_notice, store_notice, store_query, store_query_untracked,
    store_retain_query, store_set_query, store_total, AppState,
};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    let debounce_ms = config.search_debounce_ms;
    let store = Store::new(AppState::new(config.page_size));
    let ctx = ItemsContext::new(store, config);
    let events_url = ctx.api.events_url();
    provide_context(ctx.clone());
    let ctx = StoredValue::new(ctx);

    let (dialog, set_dialog) = signal::<Option<DialogMode>>(None);

    // Reload whenever the query changes
    Effect::new(move |_| {
        let query = store_query(&store);
        store_retain_query(&store, &query);
        ctx.with_value(actions::load_first_page);
    });

    // One stream serves every query: the cache only ever holds the active
    // query, and each event is applied to whichever query is active when it arrives
    let subscription = StoredValue::new_local(None::<EventSubscription>);
    match EventSubscription::open(&events_url, move |event| {
        let query = store_query_untracked(&store);
        store_apply_event(&store, &query, &event);
    }) {
        Ok(opened) => subscription.set_value(Some(opened)),
        Err(err) => log::error!("[APP] live updates unavailable: {}", err),
    }
    on_cleanup(move || {
        subscription.try_update_value(|current| *current = None);
    });

    let on_search = Callback::new(move |text: String| {
        store_set_query(&store, text.trim().to_string());
    });
    let on_edit = Callback::new(move |item: Item| set_dialog.set(Some(DialogMode::Edit(item))));

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Items"</h1>
                <SearchBar on_search=on_search debounce_ms=debounce_ms />
                <button class="new-item-btn" on:click=move |_| set_dialog.set(Some(DialogMode::Create))>
                    "New item"
                </button>
            </header>

            {move || store_notice(&store).map(|message| view! {
                <div class="notice">
                    <span>{message}</span>
                    <button on:click=move |_| store_clear_notice(&store)>"Dismiss"</button>
                </div>
            })}

            <main class="main-content">
                <ItemList on_edit=on_edit />
                <p class="item-count">{move || format!("{} items", store_total(&store))}</p>
            </main>

            <ItemDialog mode=dialog set_mode=set_dialog />
        </div>
    }
}
