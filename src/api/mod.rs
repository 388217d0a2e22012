//! Items API
//!
//! HTTP bindings for the items backend and its live event stream.

mod events;
mod items;

pub use events::EventSubscription;
pub use items::ItemsApi;
