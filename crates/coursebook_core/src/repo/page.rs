//! Sorting and pagination value types for list queries.
//!
//! # Responsibility
//! - Describe sort and page parameters without exposing SQL.
//! - Carry page results together with the cursor for the next page.
//!
//! # Invariants
//! - Page sizes are normalized: zero falls back to the default, oversized
//!   requests clamp to the maximum.

/// Default rows per page when the caller asks for size zero.
pub const PAGE_DEFAULT_SIZE: u32 = 10;
/// Upper bound on rows per page.
pub const PAGE_MAX_SIZE: u32 = 50;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sortable course columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseSortField {
    Name,
    CreatedAt,
    UpdatedAt,
}

/// Sort specification for course list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSort {
    pub field: CourseSortField,
    pub direction: SortDirection,
}

impl CourseSort {
    pub fn ascending(field: CourseSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: CourseSortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Zero-based page request with a normalized size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Builds a request for the given zero-based page, normalizing size.
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: normalize_page_size(size),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Request for the page after this one.
    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
        }
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

/// One page of results plus the totals needed to continue paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    page: u32,
    size: u32,
    total_items: u64,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_items,
        }
    }

    /// Zero-based index of this page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size (the item count may be smaller on the last page).
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u64 {
        if self.total_items == 0 {
            0
        } else {
            self.total_items.div_ceil(u64::from(self.size))
        }
    }

    /// Cursor for the next page, `None` once the last page is reached.
    pub fn next_page_request(&self) -> Option<PageRequest> {
        if u64::from(self.page) + 1 < self.total_pages() {
            Some(PageRequest::of(self.page + 1, self.size))
        } else {
            None
        }
    }
}

fn normalize_page_size(size: u32) -> u32 {
    match size {
        0 => PAGE_DEFAULT_SIZE,
        value if value > PAGE_MAX_SIZE => PAGE_MAX_SIZE,
        value => value,
    }
}
