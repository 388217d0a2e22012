//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each helper below
//! performs one synchronous step, so the cache is never observed mid-mutation.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::cache::{ItemEvent, LoadState, QueryCache};
use crate::models::Item;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Store)]
pub struct AppState {
    /// Active search query
    pub query: String,
    /// Paginated items per query
    pub cache: QueryCache,
    /// Message for the user after a failed mutation
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            cache: QueryCache::new(page_size),
            notice: None,
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Active query, tracked
pub fn store_query(store: &AppStore) -> String {
    store.query().get()
}

pub fn store_query_untracked(store: &AppStore) -> String {
    store.query().get_untracked()
}

/// Switch the active query; entries for other queries are discarded
pub fn store_set_query(store: &AppStore, query: String) {
    if store.query().get_untracked() == query {
        return;
    }
    log::info!("[STORE] query changed to {:?}", query);
    *store.query().write() = query;
}

/// Drop cached entries that do not belong to `query`
pub fn store_retain_query(store: &AppStore, query: &str) {
    store.cache().write().retain_only(query);
}

/// Flattened items of the active query
pub fn store_visible_items(store: &AppStore) -> Vec<Item> {
    let query = store.query().get();
    store.cache().read().items(&query)
}

/// Last known match count of the active query
pub fn store_total(store: &AppStore) -> u64 {
    let query = store.query().get();
    store
        .cache()
        .read()
        .pages(&query)
        .map_or(0, |pages| pages.total())
}

pub fn store_load_state(store: &AppStore) -> LoadState {
    let query = store.query().get();
    store.cache().read().load_state(&query)
}

/// Run one cache step under a single write
pub fn store_with_cache<R>(store: &AppStore, step: impl FnOnce(&mut QueryCache) -> R) -> R {
    let field = store.cache();
    let mut cache = field.write();
    step(&mut cache)
}

/// Merge a pushed event into the entry for `query`
pub fn store_apply_event(store: &AppStore, query: &str, event: &ItemEvent) {
    let changed = store_with_cache(store, |cache| cache.apply_event(query, event));
    if changed {
        log::debug!("[STORE] applied {:?}", event);
    }
}

pub fn store_notice(store: &AppStore) -> Option<String> {
    store.notice().get()
}

pub fn store_set_notice(store: &AppStore, message: String) {
    *store.notice().write() = Some(message);
}

pub fn store_clear_notice(store: &AppStore) {
    *store.notice().write() = None;
}
