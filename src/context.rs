//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ItemsApi;
use crate::config::AppConfig;
use crate::store::AppStore;

/// Store, API client and settings shared by all components
#[derive(Clone)]
pub struct ItemsContext {
    pub store: AppStore,
    pub api: ItemsApi,
    pub config: AppConfig,
}

impl ItemsContext {
    pub fn new(store: AppStore, config: AppConfig) -> Self {
        Self {
            store,
            api: ItemsApi::new(&config.api_base),
            config,
        }
    }
}

/// Get the items context
pub fn use_items_context() -> ItemsContext {
    expect_context::<ItemsContext>()
}
