//! Shared API types
//!
//! Error handling and the response envelope common to all endpoints.
//! Every response, success or failure, carries a `base_response` block
//! with a status message and a numeric status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::query::PaginationMeta;
use crate::data::sqlite::SqliteError;

/// Application status code for successful responses
pub const STATUS_OK: i32 = 0;
/// Application status code for request validation failures
pub const STATUS_VALIDATION: i32 = 100_400;
/// Application status code for data conversion failures
pub const STATUS_CONVERSION: i32 = 100_422;
/// Application status code for internal failures
pub const STATUS_INTERNAL: i32 = 100_500;

/// Status block attached to every response body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BaseResponse {
    pub status_message: String,
    pub status_code: i32,
}

impl BaseResponse {
    /// Status block for a successful response
    pub fn ok() -> Self {
        Self {
            status_message: String::new(),
            status_code: STATUS_OK,
        }
    }
}

/// Standard API error response
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request was malformed (bad operator, disallowed field, bad page math)
    #[error("{message}")]
    Validation { message: String },
    /// Stored data could not be converted for the response
    #[error("{message}")]
    Conversion { message: String },
    /// Database operation failed
    #[error("{message}")]
    Storage { message: String },
    /// Anything else
    #[error("{message}")]
    Unexpected { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    pub fn from_sqlite(e: SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self::Storage {
            message: format!("Database query error: {}", e),
        }
    }

    /// HTTP status and application status code for this error
    pub fn status(&self) -> (StatusCode, i32) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, STATUS_VALIDATION),
            Self::Conversion { .. } => (StatusCode::UNPROCESSABLE_ENTITY, STATUS_CONVERSION),
            Self::Storage { .. } | Self::Unexpected { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, STATUS_INTERNAL)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = self.to_string();
        (
            status,
            Json(serde_json::json!({
                "items": [],
                "pagination": PaginationMeta::default(),
                "base_response": {
                    "status_message": message,
                    "status_code": code
                }
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::validation("bad filter");
        let (status, code) = err.status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, STATUS_VALIDATION);
        assert_eq!(err.to_string(), "bad filter");
    }

    #[test]
    fn conversion_maps_to_unprocessable() {
        let err = ApiError::conversion("bad price");
        let (status, code) = err.status();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, STATUS_CONVERSION);
    }

    #[test]
    fn storage_and_unexpected_map_to_internal() {
        let err = ApiError::from_sqlite(sqlx::Error::PoolClosed.into());
        let (status, code) = err.status();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, STATUS_INTERNAL);
        assert!(err.to_string().starts_with("Database query error:"));

        let (status, _) = ApiError::unexpected("boom").status();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn base_response_ok_is_empty_message() {
        let base = BaseResponse::ok();
        assert_eq!(base.status_code, STATUS_OK);
        assert!(base.status_message.is_empty());
    }
}
