//! Dynamic record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::Value;
use crate::error::FieldError;
use crate::path::resolve;

/// A dynamic record fed to the table engine.
///
/// Records hold field values as a `HashMap<String, Value>`. Nested objects are
/// stored as [`Value::Record`], which is what dotted paths walk through.
///
/// # Example
///
/// ```
/// use casetable_lib::model::Record;
///
/// let client = Record::new()
///     .set("id", "c-1")
///     .set("name", "Contoso")
///     .set("risk_score", 72);
///
/// assert_eq!(client.get_string("name").unwrap(), Some("Contoso"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts any serializable value into a record.
    ///
    /// The value must serialize to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).and_then(serde_json::from_value)
    }

    /// Top-level field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Value at a dotted path such as `"owner.address.city"`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        resolve(self, path)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builder-style insert.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // Typed getters take dotted paths. A missing path or a value of another
    // type is an error; an explicit null is `Ok(None)`.

    pub fn get_string(&self, path: &str) -> Result<Option<&str>, FieldError> {
        self.typed(path, "string", |v| match v {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn get_bool(&self, path: &str) -> Result<Option<bool>, FieldError> {
        self.typed(path, "bool", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Integer value; `Int` widens to `i64`.
    pub fn get_long(&self, path: &str) -> Result<Option<i64>, FieldError> {
        self.typed(path, "long", Value::as_i64)
    }

    /// Any numeric value as `f64`.
    pub fn get_float(&self, path: &str) -> Result<Option<f64>, FieldError> {
        self.typed(path, "float", Value::as_f64)
    }

    /// Any exact numeric value as a `Decimal`.
    pub fn get_decimal(&self, path: &str) -> Result<Option<Decimal>, FieldError> {
        self.typed(path, "decimal", Value::as_decimal)
    }

    pub fn get_guid(&self, path: &str) -> Result<Option<Uuid>, FieldError> {
        self.typed(path, "guid", |v| match v {
            Value::Guid(g) => Some(*g),
            _ => None,
        })
    }

    pub fn get_datetime(&self, path: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        self.typed(path, "datetime", |v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
    }

    pub fn get_record(&self, path: &str) -> Result<Option<&Record>, FieldError> {
        self.typed(path, "record", Value::as_record)
    }

    pub fn get_list(&self, path: &str) -> Result<Option<&[Value]>, FieldError> {
        self.typed(path, "list", |v| match v {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        })
    }

    fn typed<'a, R>(
        &'a self,
        path: &str,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<R>,
    ) -> Result<Option<R>, FieldError> {
        match resolve(self, path) {
            None => Err(FieldError::missing(path)),
            Some(Value::Null) => Ok(None),
            Some(value) => extract(value)
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(path, expected, value.type_name())),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .set("name", "Alice")
            .set("alerts", 3)
            .set("pep", true)
            .set("closed_at", Value::Null);

        assert_eq!(record.get_string("name").unwrap(), Some("Alice"));
        assert_eq!(record.get_long("alerts").unwrap(), Some(3));
        assert_eq!(record.get_bool("pep").unwrap(), Some(true));
        assert_eq!(record.get_datetime("closed_at").unwrap(), None);
    }

    #[test]
    fn test_missing_and_mismatch() {
        let record = Record::new().set("name", "Alice");

        assert_eq!(
            record.get_string("email").unwrap_err(),
            FieldError::missing("email")
        );
        assert_eq!(
            record.get_bool("name").unwrap_err(),
            FieldError::type_mismatch("name", "bool", "string")
        );
    }

    #[test]
    fn test_nested_record() {
        let record = Record::new().set("owner", Record::new().set("name", "Bob"));

        let owner = record.get_record("owner").unwrap().unwrap();
        assert_eq!(owner.get_string("name").unwrap(), Some("Bob"));
    }

    #[test]
    fn test_getters_follow_paths() {
        let record = Record::new()
            .set("owner", Record::new().set("name", "Bob").set("score", 7))
            .set("tags", vec![Value::from("pep")]);

        assert_eq!(record.get_string("owner.name").unwrap(), Some("Bob"));
        assert_eq!(record.get_float("owner.score").unwrap(), Some(7.0));
        assert_eq!(record.get_string("tags.0").unwrap(), Some("pep"));
        assert_eq!(record.get_path("owner.score"), Some(&Value::from(7)));
        assert_eq!(
            record.get_long("owner.missing").unwrap_err(),
            FieldError::missing("owner.missing")
        );
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Alert {
            id: String,
            severity: i32,
        }

        let record = Record::from_serialize(&Alert {
            id: "a-1".to_string(),
            severity: 4,
        })
        .unwrap();

        assert_eq!(record.get_string("id").unwrap(), Some("a-1"));
        assert_eq!(record.get_long("severity").unwrap(), Some(4));
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        assert!(Record::from_serialize(&vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_from_iterator() {
        let record: Record = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert!(record.contains("b"));
    }
}
