//! ConfigError for table configuration

/// Error raised when a [`TableConfig`](crate::config::TableConfig) is rejected.
///
/// Data problems (bad paths, mixed value types, out-of-range pages) never
/// produce errors. Only developer-authored configuration is validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Fixed pagination was configured with a page size of zero.
    #[error("Page size must be at least 1")]
    ZeroPageSize,

    /// Two columns share the same id.
    #[error("Duplicate column id '{0}'")]
    DuplicateColumn(String),

    /// Two filter definitions share the same id.
    #[error("Duplicate filter id '{0}'")]
    DuplicateFilter(String),

    /// A search key is empty or contains an empty path segment.
    #[error("Invalid search key '{0}'")]
    InvalidSearchKey(String),

    /// The id field path is empty.
    #[error("Id field must not be empty")]
    EmptyIdField,
}
