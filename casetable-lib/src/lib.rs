//! Generic data table engine
//!
//! Turns an in-memory collection of records into a searched, filtered,
//! sorted, paginated (or infinitely scrolled) view with row selection.
//! Rendering, fetching and persistence belong to the caller.

pub mod column;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod pagination;
pub mod path;
pub mod query;
pub mod selection;
pub mod state;

pub use column::ColumnDef;
pub use config::TableConfig;
pub use engine::TableEngine;
pub use model::Record;
pub use model::Value;
pub use path::Resolve;
