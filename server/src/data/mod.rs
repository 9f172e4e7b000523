//! Data storage layer
//!
//! Provides database access for the application:
//! - `query` - Translation of query-string parameters into SQL fragments
//! - `sqlite` - SQLite persistence for the items catalog

pub mod query;
pub mod sqlite;

pub use sqlite::SqliteService;
pub use sqlite::error::SqliteError;
