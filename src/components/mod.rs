//! UI Components
//!
//! Leptos components for the item board.

mod delete_confirm_button;
mod item_dialog;
mod item_list;
mod search_bar;

pub use delete_confirm_button::DeleteConfirmButton;
pub use item_dialog::{DialogMode, ItemDialog};
pub use item_list::ItemList;
pub use search_bar::SearchBar;
