//! Serializable view state snapshot.

use serde::Deserialize;
use serde::Serialize;

use crate::query::ActiveFilters;
use crate::query::SortState;

/// Search, filters, sort and page of a table.
///
/// Used for initial state in a [`TableConfig`](crate::config::TableConfig)
/// and returned by [`TableEngine::state`](crate::engine::TableEngine::state)
/// for callers that mirror the view into a URL or another store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub search: String,
    pub filters: ActiveFilters,
    pub sort: SortState,
    /// 1-based page. Ignored in infinite scroll mode.
    pub page: usize,
    /// Initially selected row ids.
    pub selected: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: ActiveFilters::new(),
            sort: SortState::none(),
            page: 1,
            selected: Vec::new(),
        }
    }
}
