//! Page-number pagination primitives.

/// Requested page. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Largest offset or row limit a SQL backend accepts (signed 64-bit).
    pub const MAX_ROWS: u64 = i64::MAX.unsigned_abs();

    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_ROWS),
        }
    }

    /// Rows skipped before this page, capped at [`Self::MAX_ROWS`].
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(Self::MAX_ROWS)
    }
}

/// A single page of results together with the total item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, count: u64, request: PageRequest) -> Self {
        Self {
            items,
            count,
            request,
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.request.offset().saturating_add(self.request.limit) < self.count
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }

    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            request: self.request,
        }
    }
}
