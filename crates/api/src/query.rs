//! Shared query parameter types for API handlers.

use gigbook_core::paging::Page;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind into a query.
    pub fn resolve(&self) -> (i64, i64) {
        let page = Page::new(self.limit, self.offset);
        (page.limit, page.offset)
    }
}

/// `?status=&limit=&offset=` for listings filterable by status.
#[derive(Debug, Default, Deserialize)]
pub struct StatusListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl StatusListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}
