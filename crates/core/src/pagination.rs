//! Page-number pagination shared by the species and findings listings.
//!
//! Clients send `?page=&limit=`; both are normalised here so repositories
//! only ever see a valid `LIMIT`/`OFFSET` pair.

use serde::Serialize;

/// Default page size when the client does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A normalised page request (1-based page, bounded limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Normalise raw query values. Missing or non-positive pages become 1,
    /// limits are clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned next to every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(total: i64, request: &PageRequest) -> Self {
        let total = total.max(0);
        let total_pages = (total + request.limit - 1) / request.limit;
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
