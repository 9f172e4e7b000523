//! Item endpoint response types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::{ApiError, BaseResponse};
use crate::data::query::PaginationMeta;
use crate::data::sqlite::repositories::ItemRow;

/// A single item as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Exact decimal price, serialized as a string
    pub price: Decimal,
    pub quantity: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn convert_timestamp(secs: i64, item_id: i64) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        ApiError::conversion(format!(
            "Data validation failed: invalid timestamp {} for item {}",
            secs, item_id
        ))
    })
}

impl TryFrom<ItemRow> for ItemResponse {
    type Error = ApiError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|e| {
            ApiError::conversion(format!(
                "Data validation failed: invalid price '{}' for item {}: {}",
                row.price, row.id, e
            ))
        })?;
        let created_at = convert_timestamp(row.created_at, row.id)?;
        let updated_at = convert_timestamp(row.updated_at, row.id)?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price,
            quantity: row.quantity,
            category_id: row.category_id,
            created_at,
            updated_at,
        })
    }
}

/// Response envelope for the items listing
#[derive(Debug, Serialize, ToSchema)]
pub struct GetItemsResponse {
    pub items: Vec<ItemResponse>,
    pub pagination: PaginationMeta,
    pub base_response: BaseResponse,
}
