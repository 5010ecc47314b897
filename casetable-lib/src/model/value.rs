//! Dynamic field values and their text coercion

use std::borrow::Cow;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use uuid::Uuid;

use super::Record;

/// A dynamic value held by a [`Record`] field.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer (fits i32) | `Int` |
/// | integer | `Long` |
/// | fractional number | `Float` |
/// | string | `String` |
/// | object | `Record` |
/// | array | `List` |
///
/// `Decimal`, `Guid` and `DateTime` are never produced from JSON; callers
/// building records in Rust use them for amounts, identifiers and timestamps.
///
/// # Example
///
/// ```
/// use casetable_lib::model::Value;
///
/// let name = Value::from("Contoso");
/// let alerts = Value::from(12);
/// let flagged = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null. Sorts last and never matches search or filters.
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f64),
    /// Exact amount (transaction values, balances).
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    /// Timestamp, rendered as RFC 3339.
    DateTime(DateTime<Utc>),
    /// Nested object, walked by dotted paths.
    Record(Box<Record>),
    /// Array; filters match if any element matches.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for `Int`, `Long`, `Float` and `Decimal`.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Decimal(_)
        )
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "datetime",
            Value::Record(_) => "record",
            Value::List(_) => "list",
        }
    }

    /// Returns the value as an `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n as i64),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is any kind of number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Returns the value as a [`Decimal`] if it is an integer or decimal.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Long(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the nested record, if this is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Coerces the value to the text used for searching, filtering and
    /// string ordering.
    ///
    /// Null and nested records have no text. Integral floats drop their
    /// fractional part (`1.0` becomes `"1"`), lists join their elements with
    /// commas.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null | Value::Record(_) => None,
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Int(n) => Some(Cow::Owned(n.to_string())),
            Value::Long(n) => Some(Cow::Owned(n.to_string())),
            Value::Float(n) => Some(Cow::Owned(float_text(*n))),
            Value::Decimal(d) => Some(Cow::Owned(d.normalize().to_string())),
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Guid(g) => Some(Cow::Owned(g.hyphenated().to_string())),
            Value::DateTime(dt) => Some(Cow::Owned(
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            Value::List(items) => Some(Cow::Owned(
                items
                    .iter()
                    .map(|v| v.to_text().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(","),
            )),
        }
    }
}

fn float_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f64 => Float,
    Decimal => Decimal,
    String => String,
    &str => String,
    Uuid => Guid,
    DateTime<Utc> => DateTime,
    Record => Record,
    Vec<Value> => List,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_text_of_scalars() {
        assert_eq!(Value::from(true).to_text().as_deref(), Some("true"));
        assert_eq!(Value::from(42).to_text().as_deref(), Some("42"));
        assert_eq!(Value::from(3_000_000_000i64).to_text().as_deref(), Some("3000000000"));
        assert_eq!(Value::from("Doe").to_text().as_deref(), Some("Doe"));
    }

    #[test]
    fn test_text_of_floats() {
        assert_eq!(Value::from(1.0).to_text().as_deref(), Some("1"));
        assert_eq!(Value::from(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from(f64::NAN).to_text().as_deref(), Some("NaN"));
        assert_eq!(Value::from(f64::NEG_INFINITY).to_text().as_deref(), Some("-Infinity"));
    }

    #[test]
    fn test_text_of_decimal_is_normalized() {
        let amount = Decimal::from_str("1500.00").unwrap();
        assert_eq!(Value::from(amount).to_text().as_deref(), Some("1500"));
    }

    #[test]
    fn test_text_of_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            Value::from(dt).to_text().as_deref(),
            Some("2024-03-01T09:30:00Z")
        );
    }

    #[test]
    fn test_null_and_record_have_no_text() {
        assert!(Value::Null.to_text().is_none());
        assert!(Value::from(Record::new()).to_text().is_none());
    }

    #[test]
    fn test_text_of_list() {
        let list = Value::from(vec![Value::from("a"), Value::Null, Value::from(3)]);
        assert_eq!(list.to_text().as_deref(), Some("a,,3"));
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::from(7).as_i64(), Some(7));
        assert_eq!(Value::from(7.5).as_i64(), None);
        assert_eq!(Value::from(7.5).as_f64(), Some(7.5));
        assert_eq!(Value::from(7i64).as_decimal(), Some(Decimal::from(7)));
        assert!(Value::from(Decimal::ONE).is_number());
        assert!(!Value::from("7").is_number());
    }
}
