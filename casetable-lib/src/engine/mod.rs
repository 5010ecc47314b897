//! The table engine.
//!
//! [`TableEngine`] owns the records and the view state (search, filters,
//! sort, pagination, selection) and keeps a cached derived order:
//!
//! ```text
//! records -> search AND filters -> sort -> paginate -> visible rows
//! ```
//!
//! Every mutation goes through `&mut self`, rebuilds the derived order from
//! scratch and, when the state actually changed, notifies listeners
//! synchronously. Reads reuse the cached order.

mod pipeline;

use std::collections::HashMap;
use std::collections::HashSet;

use log::debug;
use log::trace;
use log::warn;

use crate::column::ColumnDef;
use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::notify::ChangeNotifier;
use crate::pagination::PageInfo;
use crate::pagination::Pagination;
use crate::path::Resolve;
use crate::query::ActiveFilters;
use crate::query::FilterChip;
use crate::query::FilterDef;
use crate::query::OptionCount;
use crate::query::SearchMatcher;
use crate::query::SortState;
use crate::selection::Selection;
use crate::state::ViewState;

use pipeline::Query;
use pipeline::derive;

/// Where row identifiers come from.
enum IdSource<T> {
    /// Text of the value at a dotted path.
    Field(String),
    /// Caller-supplied function.
    Custom(Box<dyn Fn(&T) -> String + Send + Sync>),
}

/// Searched, filtered, sorted and paginated view over in-memory records.
///
/// # Example
///
/// ```
/// use casetable_lib::column::ColumnDef;
/// use casetable_lib::config::TableConfig;
/// use casetable_lib::engine::TableEngine;
/// use casetable_lib::model::Record;
/// use casetable_lib::query::FilterDef;
///
/// let config = TableConfig::new()
///     .with_columns(vec![ColumnDef::new("name", "Name").sortable()])
///     .with_filters(vec![FilterDef::new("status", "Status").option("active", "Active")])
///     .with_search_keys(["name"]);
///
/// let records = vec![
///     Record::new().set("id", "1").set("name", "Alice").set("status", "active"),
///     Record::new().set("id", "2").set("name", "Bob").set("status", "inactive"),
///     Record::new().set("id", "3").set("name", "Carol").set("status", "active"),
/// ];
///
/// let mut table = TableEngine::new(config, records).unwrap();
/// table.toggle_filter_value("status", "active");
/// table.toggle_sort("name");
/// table.toggle_sort("name");
///
/// let names: Vec<_> = table
///     .visible_rows()
///     .into_iter()
///     .map(|row| row.get_string("name").unwrap().unwrap().to_string())
///     .collect();
/// assert_eq!(names, vec!["Carol", "Alice"]);
/// ```
pub struct TableEngine<T: Resolve> {
    records: Vec<T>,
    columns: Vec<ColumnDef>,
    filter_defs: Vec<FilterDef>,
    search_keys: Vec<String>,
    id_source: IdSource<T>,
    search: String,
    filters: ActiveFilters,
    sort: SortState,
    pagination: Pagination,
    selection: Selection,
    notifier: ChangeNotifier,
    /// Indices into `records` after search, filters and sort.
    order: Vec<usize>,
}

impl<T: Resolve> TableEngine<T> {
    /// Builds an engine from a validated configuration.
    ///
    /// Initial search, filters, sort, selection and page come from
    /// `config.initial`. No listener fires during construction.
    pub fn new(config: TableConfig, records: Vec<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        let pagination = Pagination::from_config(config.pagination)?;
        let initial = config.initial;

        let mut engine = Self {
            records,
            columns: config.columns,
            filter_defs: config.filters,
            search_keys: config.search_keys,
            id_source: IdSource::Field(config.id_field),
            search: initial.search,
            filters: initial.filters,
            sort: initial.sort,
            pagination,
            selection: Selection::from_ids(initial.selected),
            notifier: ChangeNotifier::new(),
            order: Vec::new(),
        };
        engine.refresh();
        if let Pagination::Fixed(pager) = &mut engine.pagination {
            pager.set_page(initial.page, engine.order.len());
        }
        engine.warn_duplicate_ids();
        Ok(engine)
    }

    /// Derives row identifiers with `get_id` instead of the id field.
    pub fn with_id_fn<F>(mut self, get_id: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.id_source = IdSource::Custom(Box::new(get_id));
        self.warn_duplicate_ids();
        self
    }

    // =========================================================================
    // Records and definitions
    // =========================================================================

    /// All records, in the order they were supplied.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Replaces the records.
    ///
    /// The selection is kept (ids that no longer exist stay selected) and
    /// the current page is clamped to the new row count.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.refresh();
        self.warn_duplicate_ids();
    }

    /// Appends records, typically the next batch of an infinite scroll.
    pub fn append_records<I: IntoIterator<Item = T>>(&mut self, records: I) {
        self.records.extend(records);
        self.refresh();
        self.warn_duplicate_ids();
    }

    /// Identifiers carried by more than one record, sorted.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for row in &self.records {
            *seen.entry(self.id_of(row)).or_default() += 1;
        }
        let mut duplicates: Vec<_> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort();
        duplicates
    }

    /// Identifier of a row.
    ///
    /// With the id field source, a missing or null value yields an empty id.
    pub fn id_of(&self, row: &T) -> String {
        match &self.id_source {
            IdSource::Field(path) => row
                .resolve(path)
                .and_then(|value| value.to_text().map(|text| text.into_owned()))
                .unwrap_or_default(),
            IdSource::Custom(get_id) => get_id(row),
        }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Looks up a column by id.
    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns to display, dropping `hide_on_narrow_viewport` ones when
    /// `narrow` is set.
    pub fn visible_columns(&self, narrow: bool) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| !(narrow && c.hide_on_narrow_viewport))
            .collect()
    }

    /// Display text of `column` for `row`.
    pub fn cell_text(&self, row: &T, column: &ColumnDef) -> String {
        column.format(row.resolve(&column.accessor_key).as_deref())
    }

    pub fn filter_defs(&self) -> &[FilterDef] {
        &self.filter_defs
    }

    pub fn search_keys(&self) -> &[String] {
        &self.search_keys
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Current search query, as entered.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Sets the search query. Returns the new query.
    pub fn set_search(&mut self, query: impl Into<String>) -> &str {
        let query = query.into();
        if query != self.search {
            trace!("Search changed: {:?} -> {:?}", self.search, query);
            self.search = query;
            self.pagination.reset();
            self.refresh();
            self.notifier.search_changed(&self.search);
        }
        &self.search
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn active_filters(&self) -> &ActiveFilters {
        &self.filters
    }

    /// Adds or removes one value of a filter group. Returns the new filters.
    pub fn toggle_filter_value(&mut self, filter_id: &str, value: &str) -> &ActiveFilters {
        let selected = self.filters.toggle_value(filter_id, value);
        trace!("Filter {filter_id}={value} selected={selected}");
        self.filters_changed();
        &self.filters
    }

    /// Replaces the selected values of a filter group.
    pub fn set_filter_group<I, S>(&mut self, filter_id: &str, values: I) -> &ActiveFilters
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.filters.clone();
        self.filters.set_group(filter_id, values);
        if self.filters != before {
            self.filters_changed();
        }
        &self.filters
    }

    /// Empties one filter group. Returns `true` if it had selections.
    pub fn clear_filter_group(&mut self, filter_id: &str) -> bool {
        let changed = self.filters.clear_group(filter_id);
        if changed {
            self.filters_changed();
        }
        changed
    }

    /// Empties every filter group. Returns `true` if anything was selected.
    pub fn clear_filters(&mut self) -> bool {
        let changed = self.filters.clear();
        if changed {
            self.filters_changed();
        }
        changed
    }

    /// Empties every filter group and the search query.
    ///
    /// Returns `true` if either changed.
    pub fn clear_all(&mut self) -> bool {
        let filters_changed = self.filters.clear();
        let search_changed = !self.search.is_empty();
        if !filters_changed && !search_changed {
            return false;
        }
        trace!("Clearing filters and search");
        self.search.clear();
        self.pagination.reset();
        self.refresh();
        if search_changed {
            self.notifier.search_changed(&self.search);
        }
        if filters_changed {
            self.notifier.filters_changed(&self.filters);
        }
        true
    }

    /// Chips for an inline summary of the active filters.
    pub fn filter_summary(&self) -> Vec<FilterChip> {
        self.filters.summary(&self.filter_defs)
    }

    /// Per-option row counts of a filter group over all records.
    pub fn option_counts(&self, filter_id: &str) -> Option<Vec<OptionCount>> {
        let def = self.filter_defs.iter().find(|d| d.id == filter_id)?;
        Some(ActiveFilters::option_counts(&self.records, def))
    }

    fn filters_changed(&mut self) {
        self.pagination.reset();
        self.refresh();
        self.notifier.filters_changed(&self.filters);
    }

    // =========================================================================
    // Sort
    // =========================================================================

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Sorts by `field` ascending, or flips the direction if it is already
    /// the sort field. Returns the new sort state.
    pub fn toggle_sort(&mut self, field: &str) -> &SortState {
        self.sort.toggle(field);
        trace!("Sort toggled: {:?}", self.sort);
        self.sort_changed();
        &self.sort
    }

    /// Toggles the sort on a column's accessor.
    ///
    /// Returns `None` without changing anything when the column does not
    /// exist or is not sortable.
    pub fn toggle_sort_column(&mut self, column_id: &str) -> Option<&SortState> {
        let accessor = self
            .column(column_id)
            .filter(|c| c.sortable)
            .map(|c| c.accessor_key.clone())?;
        Some(self.toggle_sort(&accessor))
    }

    /// Replaces the sort state. Returns `true` if it changed.
    pub fn set_sort(&mut self, sort: SortState) -> bool {
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        self.sort_changed();
        true
    }

    /// Returns to the incoming record order.
    pub fn clear_sort(&mut self) -> bool {
        self.set_sort(SortState::none())
    }

    fn sort_changed(&mut self) {
        self.pagination.reset();
        self.refresh();
        self.notifier.sort_changed(&self.sort);
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Current 1-based page. Always 1 for infinite scroll.
    pub fn current_page(&self) -> usize {
        match &self.pagination {
            Pagination::Fixed(pager) => pager.effective_page(self.order.len()),
            Pagination::Infinite(_) => 1,
        }
    }

    /// Number of pages. Always 1 for infinite scroll.
    pub fn total_pages(&self) -> usize {
        match &self.pagination {
            Pagination::Fixed(pager) => pager.total_pages(self.order.len()),
            Pagination::Infinite(_) => 1,
        }
    }

    /// Rows per page, `None` for infinite scroll.
    pub fn page_size(&self) -> Option<usize> {
        match &self.pagination {
            Pagination::Fixed(pager) => Some(pager.page_size()),
            Pagination::Infinite(_) => None,
        }
    }

    /// Moves to `page`, clamped to the existing pages. Returns the new page.
    pub fn set_page(&mut self, page: usize) -> usize {
        let total = self.order.len();
        match &mut self.pagination {
            Pagination::Fixed(pager) => pager.set_page(page, total),
            Pagination::Infinite(_) => 1,
        }
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let total = self.order.len();
        match &mut self.pagination {
            Pagination::Fixed(pager) => pager.next_page(total),
            Pagination::Infinite(_) => false,
        }
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        let total = self.order.len();
        match &mut self.pagination {
            Pagination::Fixed(pager) => pager.prev_page(total),
            Pagination::Infinite(_) => false,
        }
    }

    /// Changes the page size and returns to page 1.
    ///
    /// Ignored for infinite scroll.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        match &mut self.pagination {
            Pagination::Fixed(pager) => pager.set_page_size(page_size),
            Pagination::Infinite(_) => {
                debug!("Ignoring page size {page_size} in infinite scroll mode");
                Ok(())
            }
        }
    }

    /// Summary of the visible window.
    pub fn page_info(&self) -> PageInfo {
        self.pagination.info(self.order.len())
    }

    // =========================================================================
    // Infinite scroll
    // =========================================================================

    /// Reports whether the caller has more rows to load. Ignored in fixed
    /// mode.
    pub fn set_has_more(&mut self, has_more: bool) {
        if let Pagination::Infinite(scroll) = &mut self.pagination {
            scroll.set_has_more(has_more);
        }
    }

    /// Reports whether a load is in flight. Ignored in fixed mode.
    pub fn set_loading_more(&mut self, loading: bool) {
        if let Pagination::Infinite(scroll) = &mut self.pagination {
            scroll.set_loading_more(loading);
        }
    }

    /// Registers the load-more callback. Ignored in fixed mode.
    pub fn on_load_more<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        if let Pagination::Infinite(scroll) = &mut self.pagination {
            scroll.set_on_load_more(Box::new(callback));
        }
    }

    /// Reports the scroll sentinel's visibility.
    ///
    /// Returns `true` if the load-more callback fired.
    pub fn set_sentinel_visible(&mut self, visible: bool) -> bool {
        match &mut self.pagination {
            Pagination::Infinite(scroll) => scroll.set_sentinel_visible(visible),
            Pagination::Fixed(_) => false,
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Rows on screen: the current page in fixed mode, every filtered row in
    /// infinite mode.
    pub fn visible_rows(&self) -> Vec<&T> {
        let range = self.pagination.visible_range(self.order.len());
        self.order[range].iter().map(|&i| &self.records[i]).collect()
    }

    /// Every row passing search and filters, in sorted order.
    pub fn filtered_rows(&self) -> Vec<&T> {
        self.order.iter().map(|&i| &self.records[i]).collect()
    }

    /// Number of rows passing search and filters.
    pub fn filtered_count(&self) -> usize {
        self.order.len()
    }

    /// Identifiers of the visible rows, in display order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.visible_rows()
            .into_iter()
            .map(|row| self.id_of(row))
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Flips the selection of one row. Returns `true` if it is selected
    /// afterwards.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        let (added, _) = self.selection.toggle(id);
        !added.is_empty()
    }

    /// Header checkbox: clears the selection when exactly the visible rows
    /// are selected, otherwise selects exactly the visible rows.
    ///
    /// Returns `true` if every visible row is selected afterwards.
    pub fn toggle_all_visible(&mut self) -> bool {
        let visible = self.visible_ids();
        let (added, removed) = self.selection.toggle_all(&visible);
        trace!(
            "Toggled all visible: {} added, {} removed",
            added.len(),
            removed.len()
        );
        self.selection.is_all_selected(&visible)
    }

    /// `true` when the selection is exactly the (non-empty) visible rows.
    pub fn is_all_visible_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    /// `true` when some but not all visible rows are selected.
    pub fn is_partially_selected(&self) -> bool {
        self.selection.is_partially_selected(&self.visible_ids())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected identifiers, sorted.
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.selected()
    }

    /// Records whose id is selected, in record order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.records
            .iter()
            .filter(|row| self.selection.is_selected(&self.id_of(row)))
            .collect()
    }

    /// Deselects everything. Returns the ids that were selected.
    pub fn clear_selection(&mut self) -> Vec<String> {
        self.selection.clear()
    }

    // =========================================================================
    // Listeners and state
    // =========================================================================

    pub fn on_search_change<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.notifier.on_search_change(Box::new(listener));
    }

    pub fn on_filters_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ActiveFilters) + Send + 'static,
    {
        self.notifier.on_filters_change(Box::new(listener));
    }

    pub fn on_sort_change<F>(&mut self, listener: F)
    where
        F: FnMut(&SortState) + Send + 'static,
    {
        self.notifier.on_sort_change(Box::new(listener));
    }

    /// Snapshot of the view state.
    pub fn state(&self) -> ViewState {
        ViewState {
            search: self.search.clone(),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            page: self.current_page(),
            selected: self.selection.selected(),
        }
    }

    /// Rebuilds the derived order and re-clamps the current page.
    fn refresh(&mut self) {
        let query = Query {
            search: SearchMatcher::new(&self.search, &self.search_keys),
            filters: &self.filters,
            sort: &self.sort,
        };
        self.order = derive(&self.records, &query);
        if let Pagination::Fixed(pager) = &mut self.pagination {
            pager.clamp(self.order.len());
        }
        debug!(
            "Derived {} of {} rows (search={:?}, filters={}, sort={:?})",
            self.order.len(),
            self.records.len(),
            self.search,
            self.filters.active_count(),
            self.sort.field
        );
    }

    fn warn_duplicate_ids(&self) {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for row in &self.records {
            let id = self.id_of(row);
            if !seen.insert(id.clone()) && reported.insert(id.clone()) {
                warn!("Duplicate row id {id:?}; selection will treat these rows as one");
            }
        }
    }
}

impl<T: Resolve> std::fmt::Debug for TableEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("records", &self.records.len())
            .field("columns", &self.columns)
            .field("search", &self.search)
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection.len())
            .field("filtered", &self.order.len())
            .finish()
    }
}
