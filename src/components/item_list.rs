//! Item List Component
//!
//! Scrollable list of the active query's items with load-more handling.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::actions;
use crate::components::DeleteConfirmButton;
use crate::context::use_items_context;
use crate::models::Item;
use crate::store::{store_load_state, store_visible_items};

/// Items of the active query in page order
///
/// Fetching the next page starts when the scroll position nears the end of
/// the list, or when the "Load more" button is pressed.
#[component]
pub fn ItemList(#[prop(into)] on_edit: Callback<Item>) -> impl IntoView {
    let ctx = StoredValue::new(use_items_context());
    let store = ctx.with_value(|ctx| ctx.store);

    let items = Memo::new(move |_| store_visible_items(&store));
    let load_state = Memo::new(move |_| store_load_state(&store));

    let on_scroll = move |ev: web_sys::Event| {
        let Some(list) = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        ctx.with_value(|ctx| {
            actions::load_more_if_near_end(
                ctx,
                f64::from(list.scroll_top()),
                f64::from(list.client_height()),
                f64::from(list.scroll_height()),
            )
        });
    };

    let retry = Callback::new(move |_: ()| ctx.with_value(actions::retry_load));
    let load_more = Callback::new(move |_: ()| ctx.with_value(actions::load_next_page));

    view! {
        <div class="item-list" on:scroll=on_scroll>
            <Show when=move || load_state.with(|state| state.initial_pending)>
                <p class="list-status">"Loading..."</p>
            </Show>

            <ul class="items">
                <For
                    each=move || items.get()
                    key=|item| (item.id, item.title.clone(), item.description.clone())
                    children=move |item| view! { <ItemRow item=item on_edit=on_edit /> }
                />
            </ul>

            <Show when=move || {
                load_state.with(|state| !state.initial_pending && state.error.is_none())
                    && items.with(Vec::is_empty)
            }>
                <p class="list-status">"No items found"</p>
            </Show>

            {move || {
                let state = load_state.get();
                if let Some(err) = state.error {
                    view! {
                        <div class="list-error">
                            <span>{format!("Failed to load items: {}", err)}</span>
                            <button on:click=move |_| retry.run(())>"Retry"</button>
                        </div>
                    }
                    .into_any()
                } else if state.next_page_pending {
                    view! { <p class="list-status">"Loading more..."</p> }.into_any()
                } else if state.has_more {
                    view! {
                        <button class="load-more-btn" on:click=move |_| load_more.run(())>
                            "Load more"
                        </button>
                    }
                    .into_any()
                } else if !state.initial_pending && !items.with(Vec::is_empty) {
                    view! { <p class="list-status">"No more results"</p> }.into_any()
                } else {
                    ().into_any()
                }
            }}
        </div>
    }
}

/// Single row; temporary items cannot be edited until confirmed
#[component]
fn ItemRow(item: Item, on_edit: Callback<Item>) -> impl IntoView {
    let pending = item.is_temporary();
    let row_class = if pending { "item-row pending" } else { "item-row" };
    let title = item.title.clone();
    let description = item.description.clone();
    let edit_item = item.clone();

    view! {
        <li class=row_class>
            <div class="item-text">
                <span class="item-title">{title}</span>
                <span class="item-description">{description}</span>
            </div>
            <div class="item-controls">
                {pending.then(|| view! { <span class="item-status">"Saving..."</span> })}
                <button
                    class="edit-btn"
                    disabled=pending
                    on:click=move |_| on_edit.run(edit_item.clone())
                >
                    "Edit"
                </button>
                <DeleteConfirmButton item=item />
            </div>
        </li>
    }
}
