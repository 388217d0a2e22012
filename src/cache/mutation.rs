//! Mutation Coordinator
//!
//! Optimistic create, update and delete. Each pending mutation owns the
//! snapshot taken when it began; settling it touches only the entry that
//! snapshot came from, and a rollback restores that snapshot verbatim.

use super::pages::PageCollection;
use super::QueryCache;
use crate::models::{Item, ItemDraft, ItemId};

/// Hands out negative placeholder ids for unconfirmed creates.
///
/// Ids are derived from the wall clock but forced strictly decreasing, so two
/// creates in the same millisecond still get distinct ids.
#[derive(Debug, Clone, Default)]
pub struct TempIdSource {
    last: ItemId,
}

impl TempIdSource {
    pub fn next(&mut self, now_ms: f64) -> ItemId {
        let derived = -(now_ms.max(1.0).trunc() as ItemId);
        let id = derived.min(self.last.saturating_sub(1));
        self.last = id;
        id
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    query: String,
    epoch: u64,
    pages: PageCollection,
}

impl Snapshot {
    fn restore(self, cache: &mut QueryCache) {
        match cache.entry_at(&self.query, self.epoch) {
            Some(entry) => {
                entry.pages = self.pages;
                log::debug!("[MUTATION] rolled back {:?}", self.query);
            }
            None => log::debug!("[MUTATION] rollback skipped, {:?} is no longer cached", self.query),
        }
    }

    fn pages_mut<'a>(&self, cache: &'a mut QueryCache) -> Option<&'a mut PageCollection> {
        cache
            .entry_at(&self.query, self.epoch)
            .map(|entry| &mut entry.pages)
    }
}

impl QueryCache {
    /// Cancels any outstanding fetch for `query`, then captures its pages
    fn snapshot(&mut self, query: &str) -> Option<Snapshot> {
        self.cancel_fetch(query);
        self.entries.get(query).map(|entry| Snapshot {
            query: query.to_string(),
            epoch: entry.epoch,
            pages: entry.pages.clone(),
        })
    }

    /// Shows `draft` at the head of `query` under a temporary id
    pub fn begin_create(&mut self, query: &str, draft: &ItemDraft, now_ms: f64) -> PendingCreate {
        let temp_id = self.temp_ids.next(now_ms);
        let snapshot = self.snapshot(query);
        if let Some(entry) = self.entries.get_mut(query) {
            entry.pages.insert_at_head(draft.to_item(temp_id));
        }
        log::debug!("[MUTATION] create {} in {:?}", temp_id, query);
        PendingCreate { snapshot, temp_id }
    }

    /// Applies `draft` to item `id` in place
    pub fn begin_update(&mut self, query: &str, id: ItemId, draft: &ItemDraft) -> PendingUpdate {
        let snapshot = self.snapshot(query);
        if let Some(entry) = self.entries.get_mut(query) {
            entry.pages.update_fields(id, draft);
        }
        log::debug!("[MUTATION] update {} in {:?}", id, query);
        PendingUpdate { snapshot }
    }

    /// Removes item `id` from `query`
    pub fn begin_delete(&mut self, query: &str, id: ItemId) -> PendingDelete {
        let snapshot = self.snapshot(query);
        if let Some(entry) = self.entries.get_mut(query) {
            entry.pages.remove_by_id(id);
        }
        log::debug!("[MUTATION] delete {} in {:?}", id, query);
        PendingDelete { snapshot }
    }
}

#[derive(Debug)]
pub struct PendingCreate {
    snapshot: Option<Snapshot>,
    temp_id: ItemId,
}

impl PendingCreate {
    pub fn temp_id(&self) -> ItemId {
        self.temp_id
    }

    /// Swaps the placeholder for the server's item.
    ///
    /// Copies of the confirmed id that the event stream delivered while the
    /// request was in flight are removed first, each one lowering the total.
    pub fn confirm(self, cache: &mut QueryCache, created: Item) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let Some(pages) = snapshot.pages_mut(cache) else {
            return;
        };
        let duplicates = pages.remove_all(created.id);
        let id = created.id;
        if !pages.replace(self.temp_id, created.clone()) {
            pages.insert_at_head(created);
        }
        log::debug!(
            "[MUTATION] create {} confirmed as {} ({} duplicate(s) removed)",
            self.temp_id,
            id,
            duplicates
        );
    }

    pub fn rollback(self, cache: &mut QueryCache) {
        if let Some(snapshot) = self.snapshot {
            snapshot.restore(cache);
        }
    }
}

#[derive(Debug)]
pub struct PendingUpdate {
    snapshot: Option<Snapshot>,
}

impl PendingUpdate {
    /// Replaces the optimistic fields with the server's version
    pub fn confirm(self, cache: &mut QueryCache, updated: Item) {
        if let Some(snapshot) = &self.snapshot {
            if let Some(pages) = snapshot.pages_mut(cache) {
                pages.replace(updated.id, updated);
            }
        }
    }

    pub fn rollback(self, cache: &mut QueryCache) {
        if let Some(snapshot) = self.snapshot {
            snapshot.restore(cache);
        }
    }
}

/// A delete needs no confirmation step: the optimistic state is the outcome
#[derive(Debug)]
pub struct PendingDelete {
    snapshot: Option<Snapshot>,
}

impl PendingDelete {
    pub fn rollback(self, cache: &mut QueryCache) {
        if let Some(snapshot) = self.snapshot {
            snapshot.restore(cache);
        }
    }
}
