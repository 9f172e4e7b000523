//! Items listing endpoint
//!
//! One GET endpoint with generic query-string filtering, sorting, and
//! pagination. Examples:
//!
//! - `GET /api/v1/items?category_id=2` (bare key is equality)
//! - `GET /api/v1/items?price__gte=100&sort=-price`
//! - `GET /api/v1/items?filter[name][ilike]=laptop&page=2&size=20`

pub mod types;

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::routing::get;

use crate::api::types::{ApiError, BaseResponse};
use crate::core::config::PaginationConfig;
use crate::data::SqliteService;
use crate::data::query::{parse_filters, parse_pagination, parse_sorts};
use crate::data::sqlite::repositories::item;
use crate::data::sqlite::schema::ITEMS;

pub use types::{GetItemsResponse, ItemResponse};

/// Fields clients may filter on
pub const FILTERABLE_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "price",
    "quantity",
    "category_id",
    "created_at",
    "updated_at",
];

/// Fields clients may sort on (description is free text, sorting it is noise)
pub const SORTABLE_FIELDS: &[&str] = &[
    "id",
    "name",
    "price",
    "quantity",
    "category_id",
    "created_at",
    "updated_at",
];

#[derive(Clone)]
pub struct ItemsApiState {
    pub database: Arc<SqliteService>,
    pub pagination: PaginationConfig,
}

/// Build items API routes
pub fn routes(database: Arc<SqliteService>, pagination: PaginationConfig) -> axum::Router {
    let state = ItemsApiState {
        database,
        pagination,
    };

    axum::Router::new()
        .route("/", get(get_items))
        .with_state(state)
}

/// List items with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    responses(
        (status = 200, description = "Page of items", body = GetItemsResponse),
        (status = 400, description = "Invalid filter, sort, or pagination parameter"),
        (status = 422, description = "Stored data could not be converted"),
        (status = 500, description = "Database failure")
    )
)]
pub async fn get_items(
    State(state): State<ItemsApiState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<GetItemsResponse>, ApiError> {
    let filters = parse_filters(&params, Some(FILTERABLE_FIELDS))?;
    let sorts = parse_sorts(&params, Some(SORTABLE_FIELDS))?;
    let pagination = parse_pagination(&params, &state.pagination)?;

    let (rows, meta) = item::list_items(
        state.database.pool(),
        &ITEMS,
        &filters,
        &sorts,
        &pagination,
    )
    .await?;

    let items = rows
        .into_iter()
        .map(ItemResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(GetItemsResponse {
        items,
        pagination: meta,
        base_response: BaseResponse::ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    use crate::data::sqlite::repositories::{NewItem, insert_item};

    async fn setup_router() -> Router {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query("PRAGMA case_sensitive_like = ON")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();

        let fixtures = [
            ("Laptop", Some("15-inch workstation"), "999.99", 10, Some(1)),
            ("Mouse", Some("Wireless"), "29.99", 25, Some(2)),
            ("Keyboard", None, "89.99", 15, Some(2)),
            ("Monitor", Some("4K panel"), "299.99", 8, Some(1)),
            ("Headphones", None, "199.99", 12, Some(3)),
        ];
        for (name, description, price, quantity, category_id) in fixtures {
            insert_item(
                &pool,
                &NewItem {
                    name,
                    description,
                    price,
                    quantity,
                    category_id,
                },
            )
            .await
            .unwrap();
        }

        let database = Arc::new(SqliteService::from_pool(pool));
        routes(database, PaginationConfig::default())
    }

    async fn setup_empty_router() -> Router {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        let database = Arc::new(SqliteService::from_pool(pool));
        routes(database, PaginationConfig::default())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    fn names(body: &serde_json::Value) -> Vec<&str> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_database_returns_envelope() {
        let router = setup_empty_router().await;
        let (status, body) = get_json(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], serde_json::json!([]));
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["size"], 10);
        assert_eq!(body["pagination"]["page_count"], 1);
        assert_eq!(body["pagination"]["total_count"], 0);
        assert_eq!(body["pagination"]["has_next"], false);
        assert_eq!(body["pagination"]["has_prev"], false);
        assert_eq!(body["base_response"]["status_code"], 0);
        assert_eq!(body["base_response"]["status_message"], "");
    }

    #[tokio::test]
    async fn test_bare_key_filters_by_equality() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?name=Laptop").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Laptop"]);
        assert_eq!(body["items"][0]["price"], "999.99");
    }

    #[tokio::test]
    async fn test_category_filter() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?category_id=2").await;

        assert_eq!(status, StatusCode::OK);
        let mut found = names(&body);
        found.sort_unstable();
        assert_eq!(found, vec!["Keyboard", "Mouse"]);
    }

    #[tokio::test]
    async fn test_double_underscore_and_bracket_syntax_agree() {
        let router = setup_router().await;
        let (_, underscore) = get_json(router.clone(), "/?price__gte=200&sort=name").await;
        let (_, bracket) = get_json(router, "/?filter[price][gte]=200&sort=name").await;

        assert_eq!(names(&underscore), vec!["Laptop", "Monitor"]);
        assert_eq!(names(&underscore), names(&bracket));
    }

    #[tokio::test]
    async fn test_in_membership_filter() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?category_id__in=1,3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_count"], 3);
    }

    #[tokio::test]
    async fn test_ilike_matches_case_insensitively() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?name__ilike=lap").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Laptop"]);
    }

    #[tokio::test]
    async fn test_sort_desc_with_page_size() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?sort=-price&size=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Laptop", "Monitor"]);
        assert_eq!(body["pagination"]["page_count"], 3);
        assert_eq!(body["pagination"]["has_next"], true);
        assert_eq!(body["pagination"]["has_prev"], false);
    }

    #[tokio::test]
    async fn test_bracket_sort_syntax() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?sort[quantity]=desc&size=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Mouse"]);
    }

    #[tokio::test]
    async fn test_second_page_window() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?sort=price&page=2&size=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Headphones", "Monitor"]);
        assert_eq!(body["pagination"]["has_prev"], true);
        assert_eq!(body["pagination"]["has_next"], true);
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?page=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["items"], serde_json::json!([]));
        assert_eq!(body["base_response"]["status_code"], 100400);
        assert_eq!(
            body["base_response"]["status_message"],
            "Page number must be greater than 0"
        );
    }

    #[tokio::test]
    async fn test_size_above_max_is_rejected() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?size=101").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["base_response"]["status_message"],
            "Page size cannot exceed 100"
        );
    }

    #[tokio::test]
    async fn test_unknown_operator_is_rejected() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?price__foo=5").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["base_response"]["status_message"].as_str().unwrap();
        assert!(message.contains("Unsupported operator 'foo'"));
        assert!(message.contains("Supported operators:"));
    }

    #[tokio::test]
    async fn test_disallowed_sort_field_is_rejected() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?sort=description").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["base_response"]["status_message"].as_str().unwrap();
        assert!(message.contains("Sorting on field 'description' is not allowed"));
    }

    #[tokio::test]
    async fn test_disallowed_filter_field_is_rejected() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?rowid=1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["base_response"]["status_message"].as_str().unwrap();
        assert!(message.contains("Filtering on field 'rowid' is not allowed"));
    }

    #[tokio::test]
    async fn test_null_check_filter() {
        let router = setup_router().await;
        let (status, body) = get_json(router, "/?description__is_null&sort=name").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Headphones", "Keyboard"]);
    }

    #[tokio::test]
    async fn test_timestamps_are_rfc3339() {
        let router = setup_router().await;
        let (_, body) = get_json(router, "/?name=Laptop").await;

        let created = body["items"][0]["created_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }
}
