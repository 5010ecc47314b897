//! Free-text search across configured key paths.

use crate::path::Resolve;

/// Case-insensitive substring matcher.
///
/// A row matches when the text of **any** search key contains the query.
/// An empty query matches every row. Whitespace is part of the query.
///
/// # Example
///
/// ```
/// use casetable_lib::model::Record;
/// use casetable_lib::query::SearchMatcher;
///
/// let keys = vec!["name".to_string()];
/// let row = Record::new().set("name", "John Doe");
///
/// assert!(SearchMatcher::new("doe", &keys).matches(&row));
/// assert!(!SearchMatcher::new("xyz", &keys).matches(&row));
/// ```
#[derive(Debug, Clone)]
pub struct SearchMatcher<'a> {
    needle: String,
    keys: &'a [String],
}

impl<'a> SearchMatcher<'a> {
    /// Creates a matcher for `query` over the given key paths.
    pub fn new(query: &str, keys: &'a [String]) -> Self {
        Self {
            needle: query.to_lowercase(),
            keys,
        }
    }

    /// Returns `true` if no search is active.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Checks a single row.
    pub fn matches<T: Resolve + ?Sized>(&self, row: &T) -> bool {
        if self.is_empty() {
            return true;
        }
        self.keys.iter().any(|key| {
            row.resolve(key)
                .and_then(|value| {
                    let text = value.to_text()?.to_lowercase();
                    Some(text)
                })
                .is_some_and(|text| text.contains(&self.needle))
        })
    }
}
