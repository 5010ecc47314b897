//! Change notification for search, filter and sort state.
//!
//! Listeners run synchronously, in registration order, right after the state
//! changed, and receive the new state. Nothing is debounced.

use crate::query::ActiveFilters;
use crate::query::SortState;

/// Listener for search query changes.
pub type SearchListener = Box<dyn FnMut(&str) + Send>;

/// Listener for filter changes.
pub type FiltersListener = Box<dyn FnMut(&ActiveFilters) + Send>;

/// Listener for sort changes.
pub type SortListener = Box<dyn FnMut(&SortState) + Send>;

/// Registry of change listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    search: Vec<SearchListener>,
    filters: Vec<FiltersListener>,
    sort: Vec<SortListener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search_change(&mut self, listener: SearchListener) {
        self.search.push(listener);
    }

    pub fn on_filters_change(&mut self, listener: FiltersListener) {
        self.filters.push(listener);
    }

    pub fn on_sort_change(&mut self, listener: SortListener) {
        self.sort.push(listener);
    }

    pub(crate) fn search_changed(&mut self, query: &str) {
        for listener in &mut self.search {
            listener(query);
        }
    }

    pub(crate) fn filters_changed(&mut self, filters: &ActiveFilters) {
        for listener in &mut self.filters {
            listener(filters);
        }
    }

    pub(crate) fn sort_changed(&mut self, sort: &SortState) {
        for listener in &mut self.sort {
            listener(sort);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("search", &self.search.len())
            .field("filters", &self.filters.len())
            .field("sort", &self.sort.len())
            .finish()
    }
}
