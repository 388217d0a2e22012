//! Query Cache
//!
//! Paginated item lists keyed by search query. Each entry is fed by page
//! fetches, optimistic mutations and the live event stream; every write here
//! is synchronous, so callers apply them between network suspension points.

mod fetch;
mod mutation;
mod pages;
mod reconcile;

use std::collections::HashMap;

pub use fetch::{near_end, FetchTicket, LoadState};
pub use reconcile::{decode_events, ItemEvent};

use mutation::TempIdSource;
use pages::PageCollection;
use reconcile::apply_event;

use crate::models::Item;
use fetch::FetchState;

/// Cached state for one query
#[derive(Debug, Clone)]
struct QueryEntry {
    /// Distinguishes this entry from an earlier one for the same query
    epoch: u64,
    pages: PageCollection,
    fetch: FetchState,
}

#[derive(Debug, Clone)]
pub struct QueryCache {
    page_size: usize,
    entries: HashMap<String, QueryEntry>,
    /// Source for entry epochs and fetch generations
    counter: u64,
    temp_ids: TempIdSource,
}

impl QueryCache {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            entries: HashMap::new(),
            counter: 0,
            temp_ids: TempIdSource::default(),
        }
    }

    pub fn pages(&self, query: &str) -> Option<&PageCollection> {
        self.entries.get(query).map(|entry| &entry.pages)
    }

    /// Flattened items for `query`, empty when nothing is cached
    pub fn items(&self, query: &str) -> Vec<Item> {
        self.pages(query).map(PageCollection::flatten).unwrap_or_default()
    }

    /// Drops every entry except the one for `query`
    pub fn retain_only(&mut self, query: &str) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key == query);
        if self.entries.len() < before {
            log::debug!("[CACHE] discarded {} stale query entr(ies)", before - self.entries.len());
        }
    }

    /// Merges a pushed event into the entry for `query`, if it is cached
    pub fn apply_event(&mut self, query: &str, event: &ItemEvent) -> bool {
        match self.entries.get_mut(query) {
            Some(entry) => apply_event(&mut entry.pages, event),
            None => false,
        }
    }

    fn next_counter(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        self.counter
    }

    /// Entry for `query`, created empty on first use
    fn open(&mut self, query: &str) -> &mut QueryEntry {
        let page_size = self.page_size;
        let counter = &mut self.counter;
        self.entries.entry(query.to_string()).or_insert_with(|| {
            *counter = counter.wrapping_add(1);
            QueryEntry {
                epoch: *counter,
                pages: PageCollection::new(page_size),
                fetch: FetchState::default(),
            }
        })
    }

    /// Entry for `query` if it still belongs to `epoch`
    fn entry_at(&mut self, query: &str, epoch: u64) -> Option<&mut QueryEntry> {
        self.entries
            .get_mut(query)
            .filter(|entry| entry.epoch == epoch)
    }
}
