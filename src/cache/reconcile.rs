//! Event Reconciler
//!
//! Merges server-pushed change notifications into a page collection.

use serde::Deserialize;

use super::pages::PageCollection;
use crate::error::ClientError;
use crate::models::{Item, ItemId};

/// A change pushed by the server, from any client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemEvent {
    Created { item: Item },
    Updated { item: Item },
    Deleted { id: ItemId },
}

pub fn parse_event(data: &str) -> Result<ItemEvent, ClientError> {
    serde_json::from_str(data).map_err(|e| ClientError::MalformedEvent(e.to_string()))
}

/// Decodes one message body into events, one JSON object per line.
///
/// Lines may carry an SSE `data:` prefix; blank and `:` comment lines are
/// skipped. Malformed lines are logged and dropped.
pub fn decode_events(message: &str) -> Vec<ItemEvent> {
    message
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("data:").map_or(line, str::trim_start)
        })
        .filter(|line| !line.is_empty() && !line.starts_with(':'))
        .filter_map(|line| match parse_event(line) {
            Ok(event) => Some(event),
            Err(err) => {
                log::debug!("[EVENTS] dropped: {}", err);
                None
            }
        })
        .collect()
}

/// Applies one event in place. Returns whether the collection changed.
pub fn apply_event(pages: &mut PageCollection, event: &ItemEvent) -> bool {
    match event {
        ItemEvent::Created { item } => apply_created(pages, item),
        ItemEvent::Updated { item } => pages.replace(item.id, item.clone()),
        ItemEvent::Deleted { id } => pages.remove_by_id(*id),
    }
}

fn apply_created(pages: &mut PageCollection, item: &Item) -> bool {
    if pages.is_unloaded() {
        return false;
    }

    // Redelivery, or the echo of a create that was already confirmed. A
    // placeholder with the same text belongs to a different pending create.
    if pages.contains(item.id) {
        return pages.replace(item.id, item.clone());
    }

    // Echo of one of our own optimistic creates: no correlation token exists,
    // so matching text is the only signal.
    if let Some(position) = pages.find_pending_match(&item.title, &item.description) {
        pages.replace_at(position, item.clone());
        return true;
    }

    pages.insert_at_head(item.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;

    fn make_item(id: ItemId, title: &str) -> Item {
        Item {
            id,
            title: title.to_string(),
            description: "d".to_string(),
        }
    }

    fn loaded(items: Vec<Item>, total: u64) -> PageCollection {
        let mut pages = PageCollection::new(3);
        pages.append(Page::new(items, total, 1));
        pages
    }

    fn ids(pages: &PageCollection) -> Vec<ItemId> {
        pages.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_parse_events() {
        let created = parse_event(r#"{"type":"created","item":{"id":7,"title":"a","description":"b"}}"#);
        assert!(matches!(created, Ok(ItemEvent::Created { item }) if item.id == 7));

        let deleted = parse_event(r#"{"type":"deleted","id":3}"#).unwrap();
        assert_eq!(deleted, ItemEvent::Deleted { id: 3 });
    }

    #[test]
    fn test_malformed_events_are_rejected() {
        for raw in ["not json", r#"{"id":3}"#, r#"{"type":"renamed","id":3}"#, r#"{"type":"deleted"}"#] {
            assert!(matches!(parse_event(raw), Err(ClientError::MalformedEvent(_))), "{}", raw);
        }
    }

    #[test]
    fn test_decode_events_skips_bad_lines() {
        let message = "data: {\"type\":\"deleted\",\"id\":1}\n\n: keepalive\n{oops\n{\"type\":\"deleted\",\"id\":2}";
        assert_eq!(
            decode_events(message),
            vec![ItemEvent::Deleted { id: 1 }, ItemEvent::Deleted { id: 2 }]
        );
    }

    #[test]
    fn test_created_replaces_matching_temp_in_place() {
        let mut pages = loaded(vec![make_item(1, "a"), make_item(2, "b")], 2);
        pages.insert_at_head(make_item(-5, "mine"));

        let event = ItemEvent::Created { item: make_item(9, "mine") };
        assert!(apply_event(&mut pages, &event));

        assert_eq!(ids(&pages), vec![9, 1, 2]);
        assert_eq!(pages.total(), 3);
    }

    #[test]
    fn test_created_for_held_id_leaves_matching_temp_alone() {
        let mut pages = loaded(vec![make_item(1, "a")], 1);
        pages.insert_at_head(make_item(-6, "same"));
        pages.insert_at_head(make_item(7, "same"));

        assert!(apply_event(&mut pages, &ItemEvent::Created { item: make_item(7, "same") }));

        assert_eq!(ids(&pages), vec![7, -6, 1]);
        assert_eq!(pages.total(), 3);
    }

    #[test]
    fn test_created_from_elsewhere_goes_to_head() {
        let mut pages = loaded(vec![make_item(1, "a")], 1);

        apply_event(&mut pages, &ItemEvent::Created { item: make_item(4, "other") });

        assert_eq!(ids(&pages), vec![4, 1]);
        assert_eq!(pages.total(), 2);
    }

    #[test]
    fn test_created_and_updated_are_idempotent() {
        let mut pages = loaded(vec![make_item(1, "a"), make_item(2, "b")], 2);
        let created = ItemEvent::Created { item: make_item(4, "new") };
        let updated = ItemEvent::Updated { item: make_item(1, "renamed") };

        apply_event(&mut pages, &created);
        apply_event(&mut pages, &updated);
        let once = pages.clone();

        apply_event(&mut pages, &created);
        apply_event(&mut pages, &updated);
        assert_eq!(pages, once);
    }

    #[test]
    fn test_updated_and_deleted_ignore_absent_ids() {
        let mut pages = loaded(vec![make_item(1, "a")], 1);
        let before = pages.clone();

        assert!(!apply_event(&mut pages, &ItemEvent::Updated { item: make_item(8, "x") }));
        assert!(!apply_event(&mut pages, &ItemEvent::Deleted { id: 8 }));
        assert_eq!(pages, before);
    }

    #[test]
    fn test_deleted_fills_gap() {
        let mut pages = PageCollection::new(2);
        pages.append(Page::new(vec![make_item(1, "a"), make_item(2, "b")], 4, 1));
        pages.append(Page::new(vec![make_item(3, "c"), make_item(4, "d")], 4, 2));

        apply_event(&mut pages, &ItemEvent::Deleted { id: 1 });

        let sizes: Vec<usize> = pages.pages().iter().map(|p| p.items.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(ids(&pages), vec![2, 3, 4]);
        assert_eq!(pages.total(), 3);
    }

    #[test]
    fn test_created_before_first_page_is_ignored() {
        let mut pages = PageCollection::new(3);
        assert!(!apply_event(&mut pages, &ItemEvent::Created { item: make_item(1, "a") }));
    }
}
