use serde::{Deserialize, Serialize};

/// Paging metadata attached to list payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default = "first_page")]
    pub current_page: u64,
}

fn first_page() -> u64 {
    1
}

impl Pagination {
    /// Derives page counters from a total and a window.
    ///
    /// A `limit` of zero is treated as one so page arithmetic never divides by zero.
    #[must_use]
    pub fn compute(total: u64, limit: u64, offset: u64) -> Self {
        let step = limit.max(1);
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(step) < total,
            total_pages: total.div_ceil(step),
            current_page: (offset / step).saturating_add(1),
        }
    }

    /// Pagination for a list that failed to load or has no rows.
    #[must_use]
    pub fn empty(limit: u64) -> Self {
        Self {
            total: 0,
            limit,
            offset: 0,
            has_more: false,
            total_pages: 0,
            current_page: 1,
        }
    }
}

/// One page of rows plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn empty(limit: u64) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::empty(limit),
        }
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::empty(0)
    }
}

/// Page/page-size state for a paginated view. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u64,
    page_size: u64,
}

impl PageCursor {
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn change_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Changes the page size and returns to the first page.
    pub fn change_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(20)
    }
}
