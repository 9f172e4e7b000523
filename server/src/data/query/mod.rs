//! Query-string to SQL translation
//!
//! Turns raw query parameters into validated filter, sort, and pagination
//! structures, then composes them into WHERE/ORDER BY fragments with
//! positional placeholders. The pipeline is:
//!
//! 1. `params` - parse raw key/value pairs into specs, validating against
//!    per-endpoint allow-lists
//! 2. `operators` - normalize operator aliases to the canonical set
//! 3. `builder` - compose SQL fragments against an enumerated column table
//! 4. `paginate` - page math and response metadata

pub mod builder;
pub mod operators;
pub mod paginate;
pub mod params;
pub mod types;

pub use builder::{SqlParams, TableSchema, build_order_clause, build_where_clause};
pub use operators::FilterOp;
pub use paginate::PaginationMeta;
pub use params::{parse_filters, parse_pagination, parse_sorts};
pub use types::{FilterSpec, FilterValue, PaginationRequest, SortDirection, SortSpec};
