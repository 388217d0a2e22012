//! Page Store
//!
//! Ordered pages fetched for one search query. Local inserts and removals keep
//! every page except the last at the page size by moving single items across
//! page boundaries instead of re-chunking the whole list.

use std::collections::HashSet;

use crate::models::{Item, ItemDraft, ItemId, Page};

/// Location of an item inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPosition {
    pub page: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCollection {
    pages: Vec<Page>,
    page_size: usize,
    /// Item count the server returned for the most recent fetch
    last_fetch_len: Option<usize>,
    /// Set when a fetched page held nothing new, so the same page is not asked for again
    skip_to_page: Option<u32>,
}

impl PageCollection {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: Vec::new(),
            page_size: page_size.max(1),
            last_fetch_len: None,
            skip_to_page: None,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// True until the first page arrives
    pub fn is_unloaded(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    /// Last known match count (0 when unknown)
    pub fn total(&self) -> u64 {
        self.pages.last().map_or(0, |p| p.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    /// All items in display order
    pub fn flatten(&self) -> Vec<Item> {
        self.iter().cloned().collect()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.iter().any(|item| item.id == id)
    }

    pub fn find_index_by_id(&self, id: ItemId) -> Option<ItemPosition> {
        self.pages.iter().enumerate().find_map(|(page, p)| {
            p.items
                .iter()
                .position(|item| item.id == id)
                .map(|offset| ItemPosition { page, offset })
        })
    }

    /// First unconfirmed item carrying exactly this text
    pub fn find_pending_match(&self, title: &str, description: &str) -> Option<ItemPosition> {
        self.pages.iter().enumerate().find_map(|(page, p)| {
            p.items
                .iter()
                .position(|item| item.is_temporary() && item.matches_text(title, description))
                .map(|offset| ItemPosition { page, offset })
        })
    }

    /// Merges a freshly fetched page.
    ///
    /// Items whose confirmed id is already held are dropped, which happens when
    /// local edits shifted the server-side offsets. The rest first top up a
    /// short last page, so only the final page can hold fewer than `page_size`.
    /// Returns how many were dropped.
    pub fn append(&mut self, mut page: Page) -> usize {
        let fetched = page.items.len();
        self.last_fetch_len = Some(fetched);

        let mut seen: HashSet<ItemId> = self
            .iter()
            .filter(|item| !item.is_temporary())
            .map(|item| item.id)
            .collect();
        page.items.retain(|item| item.is_temporary() || seen.insert(item.id));
        let dropped = fetched - page.items.len();
        if dropped > 0 {
            log::debug!(
                "[PAGES] page {} dropped {} already held item(s)",
                page.page_number,
                dropped
            );
        }

        self.skip_to_page = (fetched > 0 && page.items.is_empty()).then_some(page.page_number + 1);

        for held in &mut self.pages {
            held.total = page.total;
        }
        if let Some(last) = self.pages.last_mut() {
            let room = self.page_size.saturating_sub(last.items.len()).min(page.items.len());
            last.items.extend(page.items.drain(..room));
        }
        if self.pages.is_empty() || !page.items.is_empty() {
            self.pages.push(page);
        }
        dropped
    }

    /// Places `item` at the front of the first page.
    ///
    /// Overflow moves one item at a time to the front of the next page. Overflow
    /// off the last page starts a new page when the query is exhausted and is
    /// otherwise dropped, since the next fetch returns it again. Returns false
    /// when nothing has been fetched yet.
    pub fn insert_at_head(&mut self, item: Item) -> bool {
        if self.pages.is_empty() {
            return false;
        }
        let exhausted = !self.has_next_page();

        let mut carry = item;
        let mut index = 0;
        loop {
            let page = &mut self.pages[index];
            page.items.insert(0, carry);
            if page.items.len() <= self.page_size {
                break;
            }
            let Some(overflow) = page.items.pop() else {
                break;
            };

            index += 1;
            if index == self.pages.len() {
                if exhausted {
                    let last = &self.pages[index - 1];
                    let next = Page::new(vec![overflow], last.total, last.page_number + 1);
                    self.pages.push(next);
                }
                break;
            }
            carry = overflow;
        }

        self.adjust_total(1);
        true
    }

    /// Replaces every occurrence of `id`. Returns false if absent.
    pub fn replace(&mut self, id: ItemId, item: Item) -> bool {
        let mut replaced = false;
        for slot in self.pages.iter_mut().flat_map(|p| p.items.iter_mut()) {
            if slot.id == id {
                *slot = item.clone();
                replaced = true;
            }
        }
        replaced
    }

    pub fn replace_at(&mut self, position: ItemPosition, item: Item) {
        if let Some(slot) = self
            .pages
            .get_mut(position.page)
            .and_then(|p| p.items.get_mut(position.offset))
        {
            *slot = item;
        }
    }

    /// Applies new text to every occurrence of `id`, keeping the id
    pub fn update_fields(&mut self, id: ItemId, draft: &ItemDraft) -> bool {
        let mut updated = false;
        for slot in self.pages.iter_mut().flat_map(|p| p.items.iter_mut()) {
            if slot.id == id {
                slot.title = draft.title.clone();
                slot.description = draft.description.clone();
                updated = true;
            }
        }
        updated
    }

    /// Removes the first occurrence of `id` and closes the gap by pulling one
    /// item from the head of each following page into the tail of the one
    /// before it. Returns false if absent.
    pub fn remove_by_id(&mut self, id: ItemId) -> bool {
        let Some(position) = self.find_index_by_id(id) else {
            return false;
        };
        self.pages[position.page].items.remove(position.offset);

        for index in position.page..self.pages.len().saturating_sub(1) {
            if self.pages[index + 1].items.is_empty() {
                break;
            }
            let shifted = self.pages[index + 1].items.remove(0);
            self.pages[index].items.push(shifted);
        }

        while self.pages.len() > 1 && self.pages.last().is_some_and(|p| p.items.is_empty()) {
            self.pages.pop();
        }

        self.adjust_total(-1);
        true
    }

    /// Removes every occurrence of `id`, returning how many were removed
    pub fn remove_all(&mut self, id: ItemId) -> usize {
        let mut removed = 0;
        while self.remove_by_id(id) {
            removed += 1;
        }
        removed
    }

    /// Whether another page should be requested.
    ///
    /// False once the last fetch came back short, or once the loaded count
    /// reaches a known total. A total of 0 counts as unknown.
    pub fn has_next_page(&self) -> bool {
        if self.pages.is_empty() {
            return true;
        }
        if self.last_fetch_len.is_some_and(|n| n < self.page_size) {
            return false;
        }
        let total = self.total();
        !(total > 0 && self.len() as u64 >= total)
    }

    /// Server page holding the first confirmed item not yet loaded.
    ///
    /// Derived from the confirmed item count, so after a local removal the
    /// page that the removal shifted is requested again.
    pub fn next_page_number(&self) -> u32 {
        let confirmed = self.iter().filter(|item| !item.is_temporary()).count();
        let page = u32::try_from(confirmed / self.page_size).unwrap_or(u32::MAX - 1) + 1;
        self.skip_to_page.map_or(page, |skip| page.max(skip))
    }

    fn adjust_total(&mut self, delta: i64) {
        for page in &mut self.pages {
            page.total = page.total.saturating_add_signed(delta);
        }
    }
}
