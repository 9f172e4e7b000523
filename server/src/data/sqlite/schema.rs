//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

use crate::data::query::TableSchema;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Queryable view of the items table for the query builder.
///
/// The column list is the single source of truth for which fields the
/// generic filter/sort machinery may touch. A field missing here is a
/// schema mismatch regardless of any endpoint allow-list.
pub const ITEMS: TableSchema = TableSchema {
    table: "items",
    columns: &[
        "id",
        "name",
        "description",
        "price",
        "quantity",
        "category_id",
        "created_at",
        "updated_at",
    ],
};

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Items catalog
-- =============================================================================
-- price carries numeric affinity so filters and sorts compare as numbers;
-- timestamps are unix seconds.
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    price NUMERIC NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    category_id INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id);
CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at);
"#;
