//! Search, filter and sort over in-memory rows.
//!
//! - [`SearchMatcher`] - case-insensitive substring search across key paths
//! - [`ActiveFilters`] - multi-select facet state and its evaluation
//! - [`SortState`] - single-field ordering with a null-last comparator
//!
//! Everything here is pure: functions take rows and state and return new
//! derived data without touching their inputs.

mod filter;
mod search;
mod sort;

pub use filter::ActiveFilters;
pub use filter::FilterChip;
pub use filter::FilterDef;
pub use filter::FilterOption;
pub use filter::OptionCount;
pub use search::SearchMatcher;
pub use sort::Direction;
pub use sort::SortState;
pub use sort::compare;
pub use sort::sort;

pub(crate) use sort::sorted_order;
