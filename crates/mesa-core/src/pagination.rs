//! # Pagination
//!
//! Page/limit arithmetic and the listing envelope returned by
//! `findAllCustomers`.

use serde::{Deserialize, Serialize};

/// Default page when the caller omits one.
const DEFAULT_PAGE: u32 = 1;

/// Default page size when the caller omits one.
const DEFAULT_LIMIT: u32 = 10;

// =============================================================================
// Pagination Request
// =============================================================================

/// Caller-supplied paging parameters.
///
/// Both fields default when omitted, so `{}` is a valid payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Number of rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

// =============================================================================
// Listing Envelope
// =============================================================================

/// Paging metadata attached to a listing reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total rows across all pages.
    pub total: i64,

    /// The page this reply covers.
    pub page: u32,

    /// The last page that has any rows.
    pub last_page: i64,
}

impl PageMeta {
    /// Builds metadata for a listing: `last_page = ceil(total / limit)`.
    pub fn new(total: i64, pagination: Pagination) -> Self {
        let limit = i64::from(pagination.limit.max(1));
        PageMeta {
            total,
            page: pagination.page,
            last_page: (total + limit - 1) / limit,
        }
    }
}

/// A page of rows plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_payload() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn test_offset() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.offset(), 0);

        let p = Pagination { page: 3, limit: 2 };
        assert_eq!(p.offset(), 4);
    }

    #[test]
    fn test_last_page_rounds_up() {
        let meta = PageMeta::new(5, Pagination { page: 1, limit: 2 });
        assert_eq!(meta.last_page, 3);

        let meta = PageMeta::new(4, Pagination { page: 1, limit: 2 });
        assert_eq!(meta.last_page, 2);

        let meta = PageMeta::new(0, Pagination { page: 1, limit: 2 });
        assert_eq!(meta.last_page, 0);
    }
}
