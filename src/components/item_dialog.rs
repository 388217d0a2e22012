//! Item Dialog Component
//!
//! Modal form for creating a new item or editing an existing one.

use leptos::prelude::*;

use crate::actions;
use crate::context::use_items_context;
use crate::models::{Item, ItemDraft};

/// What the dialog is editing
#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode {
    Create,
    Edit(Item),
}

#[component]
pub fn ItemDialog(
    mode: ReadSignal<Option<DialogMode>>,
    set_mode: WriteSignal<Option<DialogMode>>,
) -> impl IntoView {
    let ctx = StoredValue::new(use_items_context());

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (error, set_error) = signal::<Option<&'static str>>(None);

    // Prefill whenever the dialog opens
    Effect::new(move |_| {
        let draft = match mode.get() {
            Some(DialogMode::Edit(item)) => ItemDraft::from(&item),
            _ => ItemDraft::default(),
        };
        set_title.set(draft.title);
        set_description.set(draft.description);
        set_error.set(None);
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = ItemDraft::new(title.get_untracked(), description.get_untracked());
        if !draft.is_submittable() {
            set_error.set(Some("Title is required"));
            return;
        }
        match mode.get_untracked() {
            Some(DialogMode::Create) => ctx.with_value(|ctx| actions::create_item(ctx, draft)),
            Some(DialogMode::Edit(item)) => {
                ctx.with_value(|ctx| actions::update_item(ctx, item.id, draft))
            }
            None => return,
        }
        set_mode.set(None);
    };

    let heading = move || match mode.get() {
        Some(DialogMode::Edit(_)) => "Edit item",
        _ => "New item",
    };

    view! {
        <Show when=move || mode.with(Option::is_some)>
            <div class="dialog-backdrop" on:click=move |_| set_mode.set(None)>
                <form
                    class="item-dialog"
                    on:click=|ev| ev.stop_propagation()
                    on:submit=on_submit
                >
                    <h2>{heading}</h2>
                    <label>
                        "Title"
                        <input
                            type="text"
                            prop:value=move || title.get()
                            on:input=move |ev| set_title.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            prop:value=move || description.get()
                            on:input=move |ev| set_description.set(event_target_value(&ev))
                        />
                    </label>
                    {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
                    <div class="dialog-actions">
                        <button type="button" class="cancel-btn" on:click=move |_| set_mode.set(None)>
                            "Cancel"
                        </button>
                        <button type="submit">"Save"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
