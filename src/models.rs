//! Frontend Models
//!
//! Data structures matching the items API.

use serde::{Deserialize, Serialize};

/// Item identifier. Server ids are non-negative; unconfirmed items use negative ids.
pub type ItemId = i64;

/// Item data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Item {
    /// True for a placeholder that the server has not confirmed yet
    pub fn is_temporary(&self) -> bool {
        self.id < 0
    }

    /// Same text as a draft, ignoring the id
    pub fn matches_text(&self, title: &str, description: &str) -> bool {
        self.title == title && self.description == description
    }
}

/// Request body for create and update
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// A draft can be submitted once it has a non-blank title
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn to_item(&self, id: ItemId) -> Item {
        Item {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&Item> for ItemDraft {
    fn from(item: &Item) -> Self {
        Self::new(item.title.clone(), item.description.clone())
    }
}

/// One fetched slice of a query's results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub items: Vec<Item>,
    /// Server-reported match count at fetch time, adjusted locally afterwards
    pub total: u64,
    pub page_number: u32,
}

impl Page {
    pub fn new(items: Vec<Item>, total: u64, page_number: u32) -> Self {
        Self {
            items,
            total,
            page_number,
        }
    }
}
