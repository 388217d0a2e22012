//! Fetch Driver
//!
//! Forward pagination for each cached query. At most one page request is
//! outstanding per query; completions that were cancelled or outlived their
//! entry are discarded.

use super::QueryCache;
use crate::error::ClientError;
use crate::models::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    NextPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    kind: FetchKind,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub(super) struct FetchState {
    in_flight: Option<InFlight>,
    error: Option<ClientError>,
}

/// A page request handed to the network layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub query: String,
    pub page: u32,
    pub page_size: usize,
    pub kind: FetchKind,
    generation: u64,
}

/// Loading signals for the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    pub initial_pending: bool,
    pub next_page_pending: bool,
    pub has_more: bool,
    /// Last page fetch failure, cleared by the next attempt
    pub error: Option<ClientError>,
}

impl QueryCache {
    /// Requests the first page of `query` unless it is loaded or loading
    pub fn begin_initial_fetch(&mut self, query: &str) -> Option<FetchTicket> {
        let generation = self.next_counter();
        let page_size = self.page_size;
        let entry = self.open(query);
        if !entry.pages.is_unloaded() || entry.fetch.in_flight.is_some() {
            return None;
        }
        start(entry, query, 1, page_size, FetchKind::Initial, generation)
    }

    /// Requests the following page of `query`, if there is one and no request is outstanding
    pub fn begin_next_page(&mut self, query: &str) -> Option<FetchTicket> {
        let generation = self.next_counter();
        let page_size = self.page_size;
        let entry = self.entries.get_mut(query)?;
        if entry.pages.is_unloaded()
            || entry.fetch.in_flight.is_some()
            || !entry.pages.has_next_page()
        {
            return None;
        }
        let page = entry.pages.next_page_number();
        start(entry, query, page, page_size, FetchKind::NextPage, generation)
    }

    /// Applies a finished request. Returns false if the result was discarded.
    ///
    /// A failure leaves the pages untouched and is kept as the loading error.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, ClientError>,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.query) else {
            log::debug!("[FETCH] discarded page {} of dropped query {:?}", ticket.page, ticket.query);
            return false;
        };
        if entry.fetch.in_flight.map(|f| f.generation) != Some(ticket.generation) {
            log::debug!("[FETCH] discarded cancelled page {} of {:?}", ticket.page, ticket.query);
            return false;
        }
        entry.fetch.in_flight = None;

        match result {
            Ok(page) => {
                log::debug!(
                    "[FETCH] page {} of {:?}: {} item(s), total {}",
                    page.page_number,
                    ticket.query,
                    page.items.len(),
                    page.total
                );
                entry.pages.append(page);
                entry.fetch.error = None;
            }
            Err(err) => {
                log::warn!("[FETCH] page {} of {:?} failed: {}", ticket.page, ticket.query, err);
                entry.fetch.error = Some(err);
            }
        }
        true
    }

    /// Forgets the outstanding request for `query` so its result is ignored
    pub fn cancel_fetch(&mut self, query: &str) {
        if let Some(entry) = self.entries.get_mut(query) {
            if let Some(in_flight) = entry.fetch.in_flight.take() {
                log::debug!("[FETCH] cancelled {:?} fetch of {:?}", in_flight.kind, query);
            }
        }
    }

    pub fn load_state(&self, query: &str) -> LoadState {
        let Some(entry) = self.entries.get(query) else {
            return LoadState::default();
        };
        let kind = entry.fetch.in_flight.map(|f| f.kind);
        LoadState {
            initial_pending: kind == Some(FetchKind::Initial),
            next_page_pending: kind == Some(FetchKind::NextPage),
            has_more: !entry.pages.is_unloaded() && entry.pages.has_next_page(),
            error: entry.fetch.error.clone(),
        }
    }
}

fn start(
    entry: &mut super::QueryEntry,
    query: &str,
    page: u32,
    page_size: usize,
    kind: FetchKind,
    generation: u64,
) -> Option<FetchTicket> {
    entry.fetch.in_flight = Some(InFlight { kind, generation });
    entry.fetch.error = None;
    log::debug!("[FETCH] requesting page {} of {:?}", page, query);
    Some(FetchTicket {
        query: query.to_string(),
        page,
        page_size,
        kind,
        generation,
    })
}

/// Whether the viewport is within `margin` pixels of the end of the list
pub fn near_end(scroll_top: f64, client_height: f64, scroll_height: f64, margin: f64) -> bool {
    scroll_height - (scroll_top + client_height) <= margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    fn page_of(ids: std::ops::Range<i64>, total: u64, page_number: u32) -> Page {
        let items = ids
            .map(|id| Item {
                id,
                title: format!("Item {}", id),
                description: String::new(),
            })
            .collect();
        Page::new(items, total, page_number)
    }

    #[test]
    fn test_paginates_until_total() {
        let mut cache = QueryCache::new(20);

        let first = cache.begin_initial_fetch("").unwrap();
        assert_eq!(first.page, 1);
        assert!(cache.load_state("").initial_pending);
        assert!(cache.complete_fetch(first, Ok(page_of(0..20, 45, 1))));
        assert!(cache.load_state("").has_more);

        let second = cache.begin_next_page("").unwrap();
        assert_eq!(second.page, 2);
        assert!(cache.load_state("").next_page_pending);
        cache.complete_fetch(second, Ok(page_of(20..40, 45, 2)));
        assert!(cache.load_state("").has_more);

        let third = cache.begin_next_page("").unwrap();
        cache.complete_fetch(third, Ok(page_of(40..45, 45, 3)));

        let state = cache.load_state("");
        assert!(!state.has_more);
        assert!(!state.next_page_pending);
        assert!(cache.begin_next_page("").is_none());
        assert_eq!(cache.items("").len(), 45);
    }

    #[test]
    fn test_one_request_at_a_time() {
        let mut cache = QueryCache::new(2);
        assert!(cache.begin_initial_fetch("q").is_some());
        assert!(cache.begin_initial_fetch("q").is_none());
        assert!(cache.begin_next_page("q").is_none());
    }

    #[test]
    fn test_no_next_page_before_first() {
        let mut cache = QueryCache::new(2);
        assert!(cache.begin_next_page("q").is_none());
    }

    #[test]
    fn test_cancelled_result_is_discarded() {
        let mut cache = QueryCache::new(2);
        let ticket = cache.begin_initial_fetch("q").unwrap();
        cache.cancel_fetch("q");

        assert!(!cache.complete_fetch(ticket, Ok(page_of(0..2, 9, 1))));
        assert!(cache.pages("q").unwrap().is_unloaded());

        // the first fetch can be issued again
        assert!(cache.begin_initial_fetch("q").is_some());
    }

    #[test]
    fn test_result_for_recreated_query_is_discarded() {
        let mut cache = QueryCache::new(2);
        let stale = cache.begin_initial_fetch("q").unwrap();
        cache.retain_only("other");
        let fresh = cache.begin_initial_fetch("q").unwrap();

        assert!(!cache.complete_fetch(stale, Ok(page_of(0..2, 9, 1))));
        assert!(cache.complete_fetch(fresh, Ok(page_of(5..7, 9, 1))));
        assert_eq!(cache.items("q")[0].id, 5);
    }

    #[test]
    fn test_failure_keeps_pages_and_reports_error() {
        let mut cache = QueryCache::new(2);
        let first = cache.begin_initial_fetch("q").unwrap();
        cache.complete_fetch(first, Ok(page_of(0..2, 9, 1)));
        let before = cache.items("q");

        let next = cache.begin_next_page("q").unwrap();
        cache.complete_fetch(next, Err(ClientError::Network("offline".into())));

        let state = cache.load_state("q");
        assert_eq!(state.error, Some(ClientError::Network("offline".into())));
        assert!(!state.next_page_pending);
        assert_eq!(cache.items("q"), before);

        // retrying clears the error
        let retry = cache.begin_next_page("q").unwrap();
        assert_eq!(retry.page, 2);
        assert_eq!(cache.load_state("q").error, None);
    }

    #[test]
    fn test_near_end() {
        assert!(near_end(800.0, 600.0, 1500.0, 200.0));
        assert!(!near_end(0.0, 600.0, 1500.0, 200.0));
    }
}
