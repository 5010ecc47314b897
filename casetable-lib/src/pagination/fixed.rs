//! Fixed page-size pagination.

use std::ops::Range;

use crate::error::ConfigError;

/// Page-by-page slicing with a fixed page size.
///
/// The current page is always clamped to `[1, total_pages]` (page 1 when
/// there are no rows), so a slice is never out of range.
///
/// # Example
///
/// ```
/// use casetable_lib::pagination::FixedPager;
///
/// let mut pager = FixedPager::new(10).unwrap();
/// assert_eq!(pager.total_pages(15), 2);
/// assert_eq!(pager.set_page(3, 15), 2);
/// assert_eq!(pager.page_range(15), 10..15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPager {
    page_size: usize,
    current_page: usize,
}

impl FixedPager {
    /// Creates a pager on page 1.
    pub fn new(page_size: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            page_size,
            current_page: 1,
        })
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Stored page number (1-based).
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages for `total` rows.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Current page clamped to the pages that exist for `total` rows.
    pub fn effective_page(&self, total: usize) -> usize {
        self.current_page.clamp(1, self.total_pages(total).max(1))
    }

    /// Moves to `page`, clamped. Returns the new page.
    pub fn set_page(&mut self, page: usize, total: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(total).max(1));
        self.current_page
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self, total: usize) -> bool {
        let page = self.effective_page(total);
        if page >= self.total_pages(total) {
            return false;
        }
        self.current_page = page + 1;
        true
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self, total: usize) -> bool {
        let page = self.effective_page(total);
        if page <= 1 {
            return false;
        }
        self.current_page = page - 1;
        true
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Re-clamps the stored page after the row count changed.
    pub fn clamp(&mut self, total: usize) {
        self.current_page = self.effective_page(total);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.current_page = 1;
        Ok(())
    }

    /// Index range of the current page within `total` rows.
    pub fn page_range(&self, total: usize) -> Range<usize> {
        let start = ((self.effective_page(total) - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// The current page of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }
}
