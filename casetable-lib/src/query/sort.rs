//! Single-field ordering with a null-last comparator and collated text.

use std::borrow::Cow;
use std::cmp::Ordering;

use icu_collator::Collator;
use icu_collator::CollatorOptions;
use icu_collator::Strength;
use log::warn;
use serde::Deserialize;
use serde::Serialize;
use unicase::UniCase;

use crate::model::Value;
use crate::path::Resolve;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Current ordering of the table.
///
/// `field = None` keeps rows in their incoming order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub direction: Direction,
}

impl SortState {
    /// Unsorted state.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Direction::Asc,
        }
    }

    /// Descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: Direction::Desc,
        }
    }

    /// Returns `true` if a field is selected.
    pub fn is_sorted(&self) -> bool {
        self.field.is_some()
    }

    /// Flips the direction when `field` is already sorted, otherwise sorts
    /// `field` ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field.to_string());
            self.direction = Direction::Asc;
        }
    }
}

/// Returns a new ordering of `rows` according to `state`.
///
/// The input slice is never reordered. With no sort field the rows come back
/// in their original order.
pub fn sort<'a, T: Resolve + ?Sized>(rows: &[&'a T], state: &SortState) -> Vec<&'a T> {
    let Some(field) = state.field.as_deref() else {
        return rows.to_vec();
    };
    let keys: Vec<_> = rows.iter().map(|row| row.resolve(field)).collect();
    sorted_order(&keys, state.direction)
        .into_iter()
        .map(|i| rows[i])
        .collect()
}

/// Compares two resolved values under the null-last policy.
///
/// Missing and null values sort after everything else in both directions.
/// Two numbers compare numerically, two datetimes chronologically, anything
/// else by collated text.
///
/// The mode is picked per pair. [`sort`] picks one mode for the whole
/// column instead, so on a column mixing numbers and text the two can
/// disagree: `compare` orders `2` before `10`, while `sort` orders that
/// column as text and puts `10` first.
pub fn compare(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let mode = if a.is_number() && b.is_number() {
                Comparison::for_numbers([a, b].into_iter())
            } else if matches!((a, b), (Value::DateTime(_), Value::DateTime(_))) {
                Comparison::DateTime
            } else {
                Comparison::Text
            };
            apply(direction, mode.compare(a, b, &TextCollation::root()))
        }
    }
}

/// Stable permutation that sorts `keys`.
///
/// One comparison mode is chosen for the whole pass so the ordering stays
/// total: a column mixing numbers and text sorts entirely by text.
pub(crate) fn sorted_order(keys: &[Option<Cow<'_, Value>>], direction: Direction) -> Vec<usize> {
    let values: Vec<Option<&Value>> = keys.iter().map(|k| present(k.as_deref())).collect();
    let mode = Comparison::for_column(values.iter().flatten().copied());
    let text = TextCollation::root();

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| match (values[i], values[j]) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => apply(direction, mode.compare(a, b, &text)),
    });
    order
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn apply(direction: Direction, ordering: Ordering) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Integer,
    Decimal,
    Float,
    DateTime,
    Text,
}

impl Comparison {
    fn for_column<'v>(mut values: impl Iterator<Item = &'v Value> + Clone) -> Self {
        if values.clone().all(Value::is_number) {
            Self::for_numbers(values)
        } else if values.all(|v| matches!(v, Value::DateTime(_))) {
            Comparison::DateTime
        } else {
            Comparison::Text
        }
    }

    fn for_numbers<'v>(values: impl Iterator<Item = &'v Value>) -> Self {
        let mut mode = Comparison::Integer;
        for value in values {
            match value {
                Value::Float(_) => return Comparison::Float,
                Value::Decimal(_) => mode = Comparison::Decimal,
                _ => {}
            }
        }
        mode
    }

    fn compare(self, a: &Value, b: &Value, text: &TextCollation) -> Ordering {
        match self {
            Comparison::Integer => a.as_i64().cmp(&b.as_i64()),
            Comparison::Decimal => a.as_decimal().cmp(&b.as_decimal()),
            Comparison::Float => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            Comparison::DateTime => match (a, b) {
                (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
                _ => text.compare(a, b),
            },
            Comparison::Text => text.compare(a, b),
        }
    }
}

/// Unicode root collation at tertiary strength.
///
/// Base letters decide first, then accents, then case with lower case
/// first. Without collation data the order falls back to caseless code
/// point order.
struct TextCollation(Option<Collator>);

impl TextCollation {
    fn root() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Self(Some(collator)),
            Err(err) => {
                warn!("Root collation unavailable, using caseless order: {err:?}");
                Self(None)
            }
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let a = a.to_text().unwrap_or_default();
        let b = b.to_text().unwrap_or_default();
        match &self.0 {
            Some(collator) => collator.compare(&a, &b),
            None => UniCase::new(&*a)
                .cmp(&UniCase::new(&*b))
                .then_with(|| b.cmp(&a)),
        }
    }
}
