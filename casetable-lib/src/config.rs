//! Table configuration

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::column::ColumnDef;
use crate::error::ConfigError;
use crate::pagination::PaginationConfig;
use crate::path::is_valid_path;
use crate::query::ActiveFilters;
use crate::query::FilterDef;
use crate::query::SortState;
use crate::state::ViewState;

/// Default path of the row identifier.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Everything a page supplies to build a table besides its rows.
///
/// # Example
///
/// ```
/// use casetable_lib::column::ColumnDef;
/// use casetable_lib::config::TableConfig;
/// use casetable_lib::pagination::PaginationConfig;
/// use casetable_lib::query::FilterDef;
///
/// let config = TableConfig::new()
///     .with_columns(vec![
///         ColumnDef::new("name", "Client").sortable(),
///         ColumnDef::new("status", "Status"),
///     ])
///     .with_filters(vec![FilterDef::new("status", "Status").option("active", "Active")])
///     .with_search_keys(["name", "email"])
///     .with_pagination(PaginationConfig::Fixed { page_size: 25 });
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Displayed columns, in order.
    pub columns: Vec<ColumnDef>,

    /// Multi-select filter groups.
    pub filters: Vec<FilterDef>,

    /// Paths searched by the free-text query.
    pub search_keys: Vec<String>,

    /// Path of the row identifier used when no custom id function is set.
    ///
    /// Default: `"id"`
    pub id_field: String,

    /// Pagination strategy.
    ///
    /// Default: fixed, 10 rows per page
    pub pagination: PaginationConfig,

    /// Initial search, filters, sort, page and selection.
    pub initial: ViewState,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            filters: Vec::new(),
            search_keys: Vec::new(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            pagination: PaginationConfig::default(),
            initial: ViewState::default(),
        }
    }
}

impl TableConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the columns.
    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the filter groups.
    pub fn with_filters(mut self, filters: Vec<FilterDef>) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the search key paths.
    pub fn with_search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the id field path.
    pub fn with_id_field(mut self, path: impl Into<String>) -> Self {
        self.id_field = path.into();
        self
    }

    /// Sets the pagination strategy.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the initial search query.
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.initial.search = query.into();
        self
    }

    /// Sets the initial filters.
    pub fn with_active_filters(mut self, filters: ActiveFilters) -> Self {
        self.initial.filters = filters;
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.initial.sort = sort;
        self
    }

    /// Sets the initial page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.initial.page = page;
        self
    }

    /// Checks the developer-authored parts of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let PaginationConfig::Fixed { page_size: 0 } = self.pagination {
            return Err(ConfigError::ZeroPageSize);
        }

        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.id.clone()));
            }
        }

        let mut filter_ids = HashSet::new();
        for filter in &self.filters {
            if !filter_ids.insert(filter.id.as_str()) {
                return Err(ConfigError::DuplicateFilter(filter.id.clone()));
            }
        }

        if let Some(key) = self.search_keys.iter().find(|key| !is_valid_path(key)) {
            return Err(ConfigError::InvalidSearchKey(key.clone()));
        }

        if self.id_field.is_empty() {
            return Err(ConfigError::EmptyIdField);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.id_field, "id");
        assert_eq!(config.pagination, PaginationConfig::Fixed { page_size: 10 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_column() {
        let config = TableConfig::new().with_columns(vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("name", "Other"),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateColumn("name".to_string()))
        );
    }

    #[test]
    fn test_duplicate_filter() {
        let config = TableConfig::new().with_filters(vec![
            FilterDef::new("status", "Status"),
            FilterDef::new("status", "State"),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateFilter("status".to_string()))
        );
    }

    #[test]
    fn test_invalid_search_key() {
        let config = TableConfig::new().with_search_keys(["name", "client..name"]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSearchKey("client..name".to_string()))
        );
    }

    #[test]
    fn test_zero_page_size_and_empty_id() {
        let config = TableConfig::new().with_pagination(PaginationConfig::Fixed { page_size: 0 });
        assert_eq!(config.validate(), Err(ConfigError::ZeroPageSize));

        let config = TableConfig::new().with_id_field("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyIdField));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "columns": [{"id": "name", "header": "Name", "accessor_key": "name", "sortable": true}],
            "filters": [{"id": "status", "label": "Status", "options": [{"value": "active", "label": "Active"}]}],
            "search_keys": ["name"],
            "pagination": {"mode": "infinite", "has_more": true},
            "initial": {"search": "al"}
        }"#;
        let config: TableConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.columns.len(), 1);
        assert_eq!(config.filters[0].options.len(), 1);
        assert_eq!(config.id_field, "id");
        assert_eq!(config.pagination, PaginationConfig::Infinite { has_more: true });
        assert_eq!(config.initial.search, "al");
        assert!(config.validate().is_ok());
    }
}
