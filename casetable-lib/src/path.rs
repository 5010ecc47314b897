//! Dotted path resolution.
//!
//! Column and filter definitions address record fields with paths such as
//! `"client.country.code"`. Resolution never fails: a missing key, an empty
//! segment or a walk through a non-container yields `None`.

use std::borrow::Cow;

use crate::model::Record;
use crate::model::Value;
use crate::model::json_to_value;

/// Type-erased "field by path" access to a row.
///
/// The table engine is generic over any `T: Resolve`. [`Record`] and
/// `serde_json::Value` are supported out of the box; typed structs can be
/// converted with [`Record::from_serialize`], or implement this trait by hand
/// to expose their fields without a copy.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use casetable_lib::model::Value;
/// use casetable_lib::path::Resolve;
///
/// struct Alert {
///     id: String,
///     severity: i32,
/// }
///
/// impl Resolve for Alert {
///     fn resolve(&self, path: &str) -> Option<Cow<'_, Value>> {
///         match path {
///             "id" => Some(Cow::Owned(Value::from(self.id.as_str()))),
///             "severity" => Some(Cow::Owned(Value::from(self.severity))),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Resolve {
    /// Resolves a dotted path, returning `None` when any segment is missing.
    fn resolve(&self, path: &str) -> Option<Cow<'_, Value>>;
}

impl Resolve for Record {
    fn resolve(&self, path: &str) -> Option<Cow<'_, Value>> {
        resolve(self, path).map(Cow::Borrowed)
    }
}

impl Resolve for serde_json::Value {
    fn resolve(&self, path: &str) -> Option<Cow<'_, Value>> {
        let mut current = self;
        for segment in segments(path)? {
            current = match current {
                serde_json::Value::Object(map) => map.get(segment)?,
                serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Cow::Owned(json_to_value(current.clone())))
    }
}

impl<T: Resolve + ?Sized> Resolve for &T {
    fn resolve(&self, path: &str) -> Option<Cow<'_, Value>> {
        (**self).resolve(path)
    }
}

/// Resolves a dotted path against a [`Record`].
///
/// Numeric segments index into lists (`"tags.0"`).
pub fn resolve<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = segments(path)?;
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Record(nested) => nested.get(segment)?,
            Value::List(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Returns `true` if `path` is non-empty and has no empty segments.
pub fn is_valid_path(path: &str) -> bool {
    segments(path).is_some()
}

fn segments(path: &str) -> Option<std::str::Split<'_, char>> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return None;
    }
    Some(path.split('.'))
}
