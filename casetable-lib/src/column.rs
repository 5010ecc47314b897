//! Column definitions.

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// Formats a cell from the resolved value (`None` when the path is missing).
pub type CellFormatter = Arc<dyn Fn(Option<&Value>) -> String + Send + Sync>;

/// Column configuration.
///
/// Columns say which field drives a displayed column (`accessor_key`, a
/// dotted path), whether the column participates in sorting, and whether it
/// hides on narrow viewports.
///
/// # Examples
///
/// ```
/// use casetable_lib::column::ColumnDef;
///
/// let columns = vec![
///     ColumnDef::new("name", "Client").sortable(),
///     ColumnDef::new("country", "Country").accessor("address.country.code"),
///     ColumnDef::new("risk", "Risk").sortable().hide_on_narrow(),
/// ];
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub header: String,
    pub accessor_key: String,
    #[serde(skip)]
    pub cell: Option<CellFormatter>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub hide_on_narrow_viewport: bool,
}

impl ColumnDef {
    /// Create a column whose accessor is its id.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor_key: id.clone(),
            id,
            header: header.into(),
            cell: None,
            sortable: false,
            hide_on_narrow_viewport: false,
        }
    }

    /// Read the value from a different dotted path.
    pub fn accessor(mut self, path: impl Into<String>) -> Self {
        self.accessor_key = path.into();
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Hide the column on narrow viewports.
    pub fn hide_on_narrow(mut self) -> Self {
        self.hide_on_narrow_viewport = true;
        self
    }

    /// Use a custom cell formatter.
    pub fn cell<F>(mut self, format: F) -> Self
    where
        F: Fn(Option<&Value>) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(format));
        self
    }

    /// Formats a resolved value for display.
    ///
    /// Without a custom formatter, missing and null values render empty.
    pub fn format(&self, value: Option<&Value>) -> String {
        match &self.cell {
            Some(format) => format(value),
            None => value
                .and_then(Value::to_text)
                .map(|text| text.into_owned())
                .unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor_key", &self.accessor_key)
            .field("cell", &self.cell.is_some())
            .field("sortable", &self.sortable)
            .field("hide_on_narrow_viewport", &self.hide_on_narrow_viewport)
            .finish()
    }
}
