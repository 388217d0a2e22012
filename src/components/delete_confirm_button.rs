//! Delete Confirm Button Component
//!
//! Two-step delete for one item row.

use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::actions;
use crate::context::use_items_context;
use crate::models::Item;

/// Asks "Delete "<title>"?" before deleting `item`.
///
/// Disabled while the item is still a placeholder, since the server has no
/// id for it yet.
#[component]
pub fn DeleteConfirmButton(item: Item) -> impl IntoView {
    let ctx = StoredValue::new(use_items_context());
    let (armed, set_armed) = signal(false);

    let id = item.id;
    let unconfirmed = item.is_temporary();
    let prompt = format!("Delete \"{}\"?", item.title);

    let confirm = move |ev: MouseEvent| {
        ev.stop_propagation();
        set_armed.set(false);
        ctx.with_value(|ctx| actions::delete_item(ctx, id));
    };
    let keep = move |ev: MouseEvent| {
        ev.stop_propagation();
        set_armed.set(false);
    };
    let arm = move |ev: MouseEvent| {
        ev.stop_propagation();
        set_armed.set(true);
    };

    move || {
        if armed.get() {
            view! {
                <span class="delete-confirm">
                    <span class="delete-confirm-text">{prompt.clone()}</span>
                    <button class="confirm-btn" on:click=confirm>"Delete"</button>
                    <button class="cancel-btn" on:click=keep>"Keep"</button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button class="delete-btn" title="Delete item" disabled=unconfirmed on:click=arm>
                    "×"
                </button>
            }
            .into_any()
        }
    }
}
