//! Page requests for listing queries.

use reg_core::responses::{Page, Pagination};

/// 1-based page number and page size. Both are clamped to at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    #[must_use]
    pub fn offset(self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.limit)
    }

    /// Wrap a fetched slice with its pagination metadata.
    #[must_use]
    pub fn wrap<T>(self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            items,
            pagination: Pagination::new(self.page, self.limit, total),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}
