//! Pagination metadata

use serde::Serialize;
use utoipa::ToSchema;

use super::types::PaginationRequest;

/// Page metadata returned alongside every list response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    pub page: u32,
    /// Requested page size
    pub size: u32,
    /// Total number of pages (at least 1, even for empty result sets)
    pub page_count: u64,
    /// Total number of matching rows
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Compute metadata for a page of `total_count` matching rows
    pub fn new(request: &PaginationRequest, total_count: u64) -> Self {
        let size = request.size as u64;
        let page_count = if total_count == 0 {
            1
        } else {
            total_count.div_ceil(size)
        };
        Self {
            page: request.page,
            size: request.size,
            page_count,
            total_count,
            has_next: (request.page as u64) * size < total_count,
            has_prev: request.page > 1,
        }
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            page_count: 1,
            total_count: 0,
            has_next: false,
            has_prev: false,
        }
    }
}
