//! Item repository for SQLite operations

use sqlx::SqlitePool;

use crate::api::types::ApiError;
use crate::data::query::{
    FilterSpec, PaginationMeta, PaginationRequest, SortSpec, SqlParams, TableSchema,
    build_order_clause, build_where_clause,
};
use crate::data::sqlite::SqliteError;

/// An item row as stored in SQLite
///
/// `price` decodes as text whatever its stored representation; the API
/// layer parses it into a decimal and rejects rows that fail to parse.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub quantity: i64,
    pub category_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for inserting a new item
#[derive(Debug)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: &'a str,
    pub quantity: i64,
    pub category_id: Option<i64>,
}

/// List items matching the given filters, sorted and paginated
///
/// Runs two queries: a COUNT(*) with the same WHERE clause for the total,
/// then the page itself with LIMIT/OFFSET. The count uses the pre-filter
/// total so pagination metadata stays stable across pages.
pub async fn list_items(
    pool: &SqlitePool,
    schema: &TableSchema,
    filters: &[FilterSpec],
    sorts: &[SortSpec],
    pagination: &PaginationRequest,
) -> Result<(Vec<ItemRow>, PaginationMeta), ApiError> {
    let mut params = SqlParams::default();
    let where_clause = build_where_clause(schema, filters, &mut params)?;
    let order_clause = build_order_clause(schema, sorts)?;

    let count_sql = format!("SELECT COUNT(*) FROM {}{}", schema.table, where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for value in &params.values {
        count_query = count_query.bind(value);
    }
    let total_count = count_query
        .fetch_one(pool)
        .await
        .map_err(|e| ApiError::from_sqlite(e.into()))?;

    let page_sql = format!(
        "SELECT id, name, description, price, quantity, category_id, created_at, updated_at \
         FROM {}{}{} LIMIT ? OFFSET ?",
        schema.table, where_clause, order_clause
    );
    let mut page_query = sqlx::query_as::<_, ItemRow>(&page_sql);
    for value in &params.values {
        page_query = page_query.bind(value);
    }
    let rows = page_query
        .bind(pagination.size as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(pool)
        .await
        .map_err(|e| ApiError::from_sqlite(e.into()))?;

    let meta = PaginationMeta::new(pagination, total_count as u64);
    Ok((rows, meta))
}

/// Insert a new item, returning its row id
pub async fn insert_item(pool: &SqlitePool, item: &NewItem<'_>) -> Result<i64, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO items (name, description, price, quantity, category_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(item.name)
    .bind(item.description)
    .bind(item.price)
    .bind(item.quantity)
    .bind(item.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
