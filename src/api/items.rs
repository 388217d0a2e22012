//! Item Requests
//!
//! Request wrappers for list, create, update and delete.

use reqwest::Client;

use crate::error::ClientResult;
use crate::models::{Item, ItemDraft, ItemId, Page};

/// Response header carrying the match count of a list request
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Clone, Debug)]
pub struct ItemsApi {
    client: Client,
    base_url: String,
}

impl ItemsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Address of the server-sent event stream
    pub fn events_url(&self) -> String {
        self.url("/items/events")
    }

    /// Fetches one page of items matching `query`
    pub async fn list_items(&self, query: &str, page: u32, page_size: usize) -> ClientResult<Page> {
        let page_param = page.to_string();
        let size_param = page_size.to_string();
        let response = self
            .client
            .get(self.url("/items"))
            .query(&[("q", query), ("page", page_param.as_str()), ("page_size", size_param.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let total = parse_total(
            response
                .headers()
                .get(TOTAL_COUNT_HEADER)
                .and_then(|value| value.to_str().ok()),
        );
        let items: Vec<Item> = response.json().await?;
        Ok(Page::new(items, total, page))
    }

    pub async fn create_item(&self, draft: &ItemDraft) -> ClientResult<Item> {
        let item = self
            .client
            .post(self.url("/items"))
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(item)
    }

    pub async fn update_item(&self, id: ItemId, draft: &ItemDraft) -> ClientResult<Item> {
        let item = self
            .client
            .put(self.url(&format!("/items/{}", id)))
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, id: ItemId) -> ClientResult<()> {
        self.client
            .delete(self.url(&format!("/items/{}", id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Reads the total count header; missing or unreadable means 0 (unknown)
pub fn parse_total(header: Option<&str>) -> u64 {
    header.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total() {
        assert_eq!(parse_total(Some("45")), 45);
        assert_eq!(parse_total(Some(" 7 ")), 7);
        assert_eq!(parse_total(Some("many")), 0);
        assert_eq!(parse_total(None), 0);
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let api = ItemsApi::new("http://localhost:8000/");
        assert_eq!(api.url("/items"), "http://localhost:8000/items");
        assert_eq!(api.events_url(), "http://localhost:8000/items/events");
    }
}
