/// Page-windowed listing shared by the project and task services
///
/// Listing endpoints accept a 1-based page number and a page size, both
/// optional. The window is `offset = (page - 1) * limit`, and results are
/// wrapped in an envelope carrying the total match count and the derived
/// page count.
///
/// # Example
///
/// ```
/// use taskhub_shared::page::{Page, PageParams};
///
/// let params = PageParams::new(Some(3), Some(2), 10);
/// assert_eq!(params.offset(), 4);
///
/// let page = Page::new(vec!["e"], 5, params);
/// assert_eq!(page.pages, 3);
/// ```

use serde::Serialize;

/// Hard ceiling on page size, preventing unbounded scans
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default page size for project listings
pub const DEFAULT_PROJECT_PAGE_SIZE: u32 = 10;

/// Default page size for task listings
pub const DEFAULT_TASK_PAGE_SIZE: u32 = 20;

/// Normalized pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: u32,

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`
    pub limit: u32,
}

impl PageParams {
    /// Normalizes raw query values.
    ///
    /// Missing or zero page falls back to 1; missing limit falls back to
    /// the per-resource default; any limit is clamped to the ceiling.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of records to skip before the window starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Records inside the window
    pub items: Vec<T>,

    /// Total records matching the query, across all pages
    pub total: u64,

    /// 1-based page number that was served
    pub page: u32,

    /// Page size that was applied
    pub limit: u32,

    /// Total page count: `ceil(total / limit)`
    pub pages: u64,
}

impl<T> Page<T> {
    /// Wraps a windowed result set in the pagination envelope
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            pages: total.div_ceil(u64::from(params.limit)),
        }
    }
}
