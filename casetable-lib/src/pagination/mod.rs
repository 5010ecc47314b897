//! Pagination strategies.
//!
//! A table uses exactly one strategy for its whole lifetime:
//!
//! - [`FixedPager`] - classic page-by-page slicing
//! - [`InfiniteScroll`] - every row visible, more rows requested from the
//!   caller when the scroll sentinel comes into view

mod fixed;
mod infinite;

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

pub use fixed::FixedPager;
pub use infinite::InfiniteScroll;
pub use infinite::LoadMoreCallback;

use crate::error::ConfigError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Serializable choice of pagination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PaginationConfig {
    /// Fixed page size.
    Fixed {
        #[serde(default = "default_page_size")]
        page_size: usize,
    },
    /// Caller-driven infinite scroll.
    Infinite {
        #[serde(default)]
        has_more: bool,
    },
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig::Fixed {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Runtime pagination state.
#[derive(Debug)]
pub enum Pagination {
    Fixed(FixedPager),
    Infinite(InfiniteScroll),
}

impl Pagination {
    /// Builds the runtime state for a configuration.
    pub fn from_config(config: PaginationConfig) -> Result<Self, ConfigError> {
        Ok(match config {
            PaginationConfig::Fixed { page_size } => Pagination::Fixed(FixedPager::new(page_size)?),
            PaginationConfig::Infinite { has_more } => {
                Pagination::Infinite(InfiniteScroll::new(has_more))
            }
        })
    }

    /// Range of the derived rows that are visible.
    pub fn visible_range(&self, total: usize) -> Range<usize> {
        match self {
            Pagination::Fixed(pager) => pager.page_range(total),
            Pagination::Infinite(_) => 0..total,
        }
    }

    /// Returns to the first page. No-op for infinite scroll.
    pub fn reset(&mut self) {
        if let Pagination::Fixed(pager) = self {
            pager.reset();
        }
    }

    /// Describes the visible window.
    pub fn info(&self, total: usize) -> PageInfo {
        let range = self.visible_range(total);
        let (current_page, total_pages, page_size, has_more) = match self {
            Pagination::Fixed(pager) => (
                pager.effective_page(total),
                pager.total_pages(total),
                Some(pager.page_size()),
                false,
            ),
            Pagination::Infinite(scroll) => (1, 1, None, scroll.has_more()),
        };
        PageInfo {
            current_page,
            total_pages,
            page_size,
            first: if range.is_empty() { 0 } else { range.start + 1 },
            last: range.end,
            total,
            has_more,
        }
    }
}

/// Summary of the visible window, for "Showing 11-20 of 45" footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub current_page: usize,
    /// Number of pages (0 when there are no rows in fixed mode).
    pub total_pages: usize,
    /// Rows per page; `None` for infinite scroll.
    pub page_size: Option<usize>,
    /// 1-based index of the first visible row, 0 when nothing is visible.
    pub first: usize,
    /// 1-based index of the last visible row.
    pub last: usize,
    /// Rows after search and filters.
    pub total: usize,
    /// Caller reports more rows to load (infinite scroll only).
    pub has_more: bool,
}
