//! SQLite repositories

pub mod item;

pub use item::{ItemRow, NewItem, insert_item, list_items};
