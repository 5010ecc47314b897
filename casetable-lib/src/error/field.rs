//! FieldError for typed record access

/// Error returned by the typed getters of [`Record`](crate::model::Record).
///
/// Path resolution on its own never fails; only callers asking for a value
/// of a specific type get this error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Nothing lives at the path.
    #[error("No value at '{path}'")]
    Missing { path: String },

    /// The value at the path has another type.
    #[error("Value at '{path}' is {actual}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// The dotted path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Missing { path } | Self::TypeMismatch { path, .. } => path,
        }
    }
}
