//! Dynamic record model

mod record;
mod record_serde;
mod value;

pub use record::*;
pub use record_serde::json_to_value;
pub use value::*;
