//! Item Actions
//!
//! Entry points for fetching and mutating items. Cache steps run
//! synchronously before and after each network call.

use leptos::task::spawn_local;

use crate::cache::{near_end, FetchTicket};
use crate::context::ItemsContext;
use crate::error::ClientError;
use crate::models::{ItemDraft, ItemId};
use crate::store::{store_query_untracked, store_set_notice, store_with_cache};

/// Fetch the first page of the active query unless it is loaded or loading
pub fn load_first_page(ctx: &ItemsContext) {
    let query = store_query_untracked(&ctx.store);
    if let Some(ticket) = store_with_cache(&ctx.store, |cache| cache.begin_initial_fetch(&query)) {
        spawn_fetch(ctx, ticket);
    }
}

/// Fetch the next page of the active query if there is one and none is outstanding
pub fn load_next_page(ctx: &ItemsContext) {
    let query = store_query_untracked(&ctx.store);
    if let Some(ticket) = store_with_cache(&ctx.store, |cache| cache.begin_next_page(&query)) {
        spawn_fetch(ctx, ticket);
    }
}

/// Scroll hook: request the next page once the viewport nears the end
pub fn load_more_if_near_end(ctx: &ItemsContext, scroll_top: f64, client_height: f64, scroll_height: f64) {
    if near_end(scroll_top, client_height, scroll_height, ctx.config.load_more_margin_px) {
        load_next_page(ctx);
    }
}

/// Retry after a failed page fetch
pub fn retry_load(ctx: &ItemsContext) {
    load_first_page(ctx);
    load_next_page(ctx);
}

fn spawn_fetch(ctx: &ItemsContext, ticket: FetchTicket) {
    let store = ctx.store;
    let api = ctx.api.clone();
    spawn_local(async move {
        let result = api
            .list_items(&ticket.query, ticket.page, ticket.page_size)
            .await;
        store_with_cache(&store, |cache| cache.complete_fetch(ticket, result));
    });
}

pub fn create_item(ctx: &ItemsContext, draft: ItemDraft) {
    let query = store_query_untracked(&ctx.store);
    let now = js_sys::Date::now();
    let pending = store_with_cache(&ctx.store, |cache| cache.begin_create(&query, &draft, now));
    let temp_id = pending.temp_id();

    let ctx = ctx.clone();
    spawn_local(async move {
        match ctx.api.create_item(&draft).await {
            Ok(item) => store_with_cache(&ctx.store, |cache| pending.confirm(cache, item)),
            Err(err) => {
                log::debug!("[ACTIONS] dropping placeholder {}", temp_id);
                store_with_cache(&ctx.store, |cache| pending.rollback(cache));
                report_failure(&ctx, "create", &err);
            }
        }
        load_first_page(&ctx);
    });
}

pub fn update_item(ctx: &ItemsContext, id: ItemId, draft: ItemDraft) {
    let query = store_query_untracked(&ctx.store);
    let pending = store_with_cache(&ctx.store, |cache| cache.begin_update(&query, id, &draft));

    let ctx = ctx.clone();
    spawn_local(async move {
        match ctx.api.update_item(id, &draft).await {
            Ok(item) => store_with_cache(&ctx.store, |cache| pending.confirm(cache, item)),
            Err(err) => {
                store_with_cache(&ctx.store, |cache| pending.rollback(cache));
                report_failure(&ctx, "update", &err);
            }
        }
        load_first_page(&ctx);
    });
}

pub fn delete_item(ctx: &ItemsContext, id: ItemId) {
    let query = store_query_untracked(&ctx.store);
    let pending = store_with_cache(&ctx.store, |cache| cache.begin_delete(&query, id));

    let ctx = ctx.clone();
    spawn_local(async move {
        if let Err(err) = ctx.api.delete_item(id).await {
            store_with_cache(&ctx.store, |cache| pending.rollback(cache));
            report_failure(&ctx, "delete", &err);
        }
        load_first_page(&ctx);
    });
}

fn report_failure(ctx: &ItemsContext, action: &str, err: &ClientError) {
    log::warn!("[ACTIONS] {} failed, changes rolled back: {}", action, err);
    store_set_notice(&ctx.store, format!("Could not {} item: {}", action, err));
}
