/// Largest page a client may request.
pub const MAX_PAGE_LENGTH: i64 = 100;

/// Highest page whose offset still fits in an `i64` at any allowed length.
const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_LENGTH;

/// 1-based page window over a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_length: i64,
}

impl Pagination {
    /// Clamps `page` to `1..=MAX_PAGE` and `page_length` to `1..=MAX_PAGE_LENGTH`,
    /// so the derived offset is never negative and never overflows.
    pub fn new(page: i64, page_length: i64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            page_length: page_length.clamp(1, MAX_PAGE_LENGTH),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_length)
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.page_length - 1) / self.page_length
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> i64 {
        self.pagination.page_count(self.total)
    }
}
