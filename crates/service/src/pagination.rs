//! Pagination utilities for service layer
//!
//! Provides a `Pagination` request, the `Page` it produces over an in-memory
//! slice, and parsing of the raw `page` query value.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index; anything below 1 is out of range
    pub page: i64,
    /// items per page
    pub per_page: u32,
}

/// One page of items plus the totals needed to navigate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub count: usize,
    pub data: Vec<T>,
}

impl Pagination {
    pub fn new(page: i64, per_page: u32) -> Self { Self { page, per_page } }

    /// Build from the raw `page` query value. Missing or empty means page 1.
    pub fn parse(page: Option<&str>, per_page: u32) -> Result<Self, ServiceError> {
        Ok(Self::new(parse_page(page)?, per_page))
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`
    pub fn per_page(self) -> usize {
        self.per_page.clamp(1, MAX_PER_PAGE) as usize
    }

    pub fn total_pages(self, total_items: usize) -> usize {
        total_items.div_ceil(self.per_page())
    }

    /// Slice `items` into the requested page.
    ///
    /// The page must lie in `1..=total_pages`; with no items there is no valid page.
    /// The last page holds whatever remains, a full page when the item count is an
    /// exact multiple of the page size.
    pub fn apply<T: Clone>(self, items: &[T]) -> Result<Page<T>, ServiceError> {
        let total_pages = self.total_pages(items.len());
        if self.page < 1 || self.page as u64 > total_pages as u64 {
            return Err(ServiceError::OutOfRange(format!(
                "page {} outside 1..={}",
                self.page, total_pages
            )));
        }
        let page = self.page as usize;
        let per_page = self.per_page();
        let low = per_page * (page - 1);
        let high = (low + per_page).min(items.len());
        let data = items[low..high].to_vec();
        Ok(Page { page, total_pages, count: data.len(), data })
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// Parse a `page` query value. Absent or empty is page 1, non-numeric is invalid input.
/// Negative values parse and are rejected later as out of range.
pub fn parse_page(raw: Option<&str>) -> Result<i64, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(v) => v
            .parse::<i64>()
            .map_err(|_| ServiceError::InvalidInput(format!("page `{v}` is not a number"))),
    }
}

pub fn paginate<T: Clone>(items: &[T], page: i64, per_page: u32) -> Result<Page<T>, ServiceError> {
    Pagination::new(page, per_page).apply(items)
}
