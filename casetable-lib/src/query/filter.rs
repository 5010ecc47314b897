//! Multi-select facet filters.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;
use crate::path::Resolve;

/// One selectable option of a filter group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value compared against the row's field text.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A categorical multi-select filter.
///
/// The `id` doubles as the dotted path of the field being filtered.
///
/// # Example
///
/// ```
/// use casetable_lib::query::FilterDef;
///
/// let status = FilterDef::new("status", "Status")
///     .option("open", "Open")
///     .option("escalated", "Escalated")
///     .option("closed", "Closed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl FilterDef {
    /// Creates a filter group without options.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    /// Adds an option (builder pattern).
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FilterOption::new(value, label));
        self
    }

    /// Returns the label of the option with the given value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// One active filter value, as shown by an inline filter summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub filter_id: String,
    pub filter_label: String,
    pub value: String,
    /// Option label, or the raw value when no option carries it.
    pub label: String,
}

/// How many rows carry a filter option's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCount {
    pub option: FilterOption,
    pub count: usize,
}

/// Selected values per filter id.
///
/// Groups combine with AND; values inside a group combine with OR. A group
/// with no selected values imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl ActiveFilters {
    /// Creates an empty filter state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no group constrains rows.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }

    /// Total number of selected values across all groups.
    pub fn active_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Returns the selected values of a group.
    pub fn selected(&self, filter_id: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(filter_id)
    }

    /// Returns `true` if `value` is selected in the group.
    pub fn is_active(&self, filter_id: &str, value: &str) -> bool {
        self.groups
            .get(filter_id)
            .is_some_and(|values| values.contains(value))
    }

    /// Iterates over the non-empty groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.groups
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(id, values)| (id.as_str(), values))
    }

    /// Adds the value if absent, removes it if present.
    ///
    /// Returns `true` if the value is selected afterwards.
    pub fn toggle_value(&mut self, filter_id: &str, value: &str) -> bool {
        let values = self.groups.entry(filter_id.to_string()).or_default();
        let selected = if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        };
        if values.is_empty() {
            self.groups.remove(filter_id);
        }
        selected
    }

    /// Replaces the selected values of a group.
    pub fn set_group<I, S>(&mut self, filter_id: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.groups.remove(filter_id);
        } else {
            self.groups.insert(filter_id.to_string(), values);
        }
    }

    /// Empties one group. Returns `true` if it had selections.
    pub fn clear_group(&mut self, filter_id: &str) -> bool {
        self.groups
            .remove(filter_id)
            .is_some_and(|values| !values.is_empty())
    }

    /// Empties every group. Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.is_empty();
        self.groups.clear();
        had_any
    }

    /// Evaluates every non-empty group against a row.
    ///
    /// Each group id is resolved as a dotted path, whether or not a
    /// [`FilterDef`] declares it.
    pub fn matches<T: Resolve + ?Sized>(&self, row: &T) -> bool {
        self.groups
            .iter()
            .filter(|(_, selected)| !selected.is_empty())
            .all(|(id, selected)| {
                row.resolve(id)
                    .is_some_and(|value| value_selected(&value, selected))
            })
    }

    /// Builds the chip list for an inline filter summary.
    ///
    /// Declared groups come first in definition order, labelled from `defs`.
    /// Groups without a definition follow, labelled by their raw id and value.
    pub fn summary(&self, defs: &[FilterDef]) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        for def in defs {
            let Some(values) = self.groups.get(&def.id) else {
                continue;
            };
            for value in values {
                chips.push(FilterChip {
                    filter_id: def.id.clone(),
                    filter_label: def.label.clone(),
                    value: value.clone(),
                    label: def.option_label(value).unwrap_or(value).to_string(),
                });
            }
        }
        let undeclared = self
            .groups
            .iter()
            .filter(|(id, _)| !defs.iter().any(|def| &def.id == *id));
        for (id, values) in undeclared {
            for value in values {
                chips.push(FilterChip {
                    filter_id: id.clone(),
                    filter_label: id.clone(),
                    value: value.clone(),
                    label: value.clone(),
                });
            }
        }
        chips
    }

    /// Counts, for every option of `def`, the rows that carry its value.
    pub fn option_counts<'a, T, I>(rows: I, def: &FilterDef) -> Vec<OptionCount>
    where
        T: Resolve + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut counts = vec![0usize; def.options.len()];
        for row in rows {
            let Some(value) = row.resolve(&def.id) else {
                continue;
            };
            for (count, option) in counts.iter_mut().zip(&def.options) {
                if value_has_text(&value, &option.value) {
                    *count += 1;
                }
            }
        }
        def.options
            .iter()
            .cloned()
            .zip(counts)
            .map(|(option, count)| OptionCount { option, count })
            .collect()
    }
}

fn value_selected(value: &Value, selected: &BTreeSet<String>) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| value_selected(item, selected)),
        other => other
            .to_text()
            .is_some_and(|text| selected.contains(&*text)),
    }
}

fn value_has_text(value: &Value, wanted: &str) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| value_has_text(item, wanted)),
        other => other.to_text().is_some_and(|text| text == wanted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    fn defs() -> Vec<FilterDef> {
        vec![
            FilterDef::new("status", "Status")
                .option("active", "Active")
                .option("pending", "Pending"),
            FilterDef::new("category", "Category").option("A", "Category A"),
        ]
    }

    #[test]
    fn test_toggle_value_is_idempotent_pair() {
        let mut filters = ActiveFilters::new();
        assert!(filters.toggle_value("status", "active"));
        assert!(filters.is_active("status", "active"));
        assert!(!filters.toggle_value("status", "active"));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_single_group() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("status", "active");

        let rows = [
            Record::new().set("status", "active"),
            Record::new().set("status", "pending"),
        ];
        let passing: Vec<_> = rows.iter().filter(|r| filters.matches(*r)).collect();
        assert_eq!(passing.len(), 1);
    }

    #[test]
    fn test_or_within_group() {
        let mut filters = ActiveFilters::new();
        filters.set_group("status", ["active", "pending"]);

        assert!(filters.matches(&Record::new().set("status", "pending")));
        assert!(!filters.matches(&Record::new().set("status", "closed")));
    }

    #[test]
    fn test_and_across_groups() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("status", "active");
        filters.toggle_value("category", "A");

        let row = Record::new().set("status", "active").set("category", "B");
        assert!(!filters.matches(&row));

        let row = Record::new().set("status", "active").set("category", "A");
        assert!(filters.matches(&row));
    }

    #[test]
    fn test_missing_field_fails_active_group() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("status", "active");
        assert!(!filters.matches(&Record::new()));
    }

    #[test]
    fn test_non_string_values_compare_by_text() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("risk.level", "3");

        let row = Record::new().set("risk", Record::new().set("level", 3));
        assert!(filters.matches(&row));
    }

    #[test]
    fn test_list_values_match_any_element() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("tags", "pep");

        let row = Record::new().set("tags", vec![Value::from("sanctions"), Value::from("pep")]);
        assert!(filters.matches(&row));
    }

    #[test]
    fn test_undeclared_groups_filter_by_path() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("country", "NL");

        assert!(filters.matches(&Record::new().set("country", "NL")));
        assert!(!filters.matches(&Record::new().set("country", "BE")));
        assert!(!filters.matches(&Record::new()));
    }

    #[test]
    fn test_summary_lists_undeclared_groups_last() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("country", "NL");
        filters.toggle_value("status", "active");

        let chips = filters.summary(&defs());
        let pairs: Vec<_> = chips
            .iter()
            .map(|c| (c.filter_label.as_str(), c.label.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Status", "Active"), ("country", "NL")]);
    }

    #[test]
    fn test_clear_group_and_clear() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("status", "active");
        filters.toggle_value("category", "A");
        assert_eq!(filters.active_count(), 2);

        assert!(filters.clear_group("status"));
        assert!(!filters.clear_group("status"));
        assert_eq!(filters.active_count(), 1);

        assert!(filters.clear());
        assert!(!filters.clear());
    }

    #[test]
    fn test_summary_uses_option_labels() {
        let mut filters = ActiveFilters::new();
        filters.toggle_value("category", "A");
        filters.toggle_value("status", "pending");
        filters.toggle_value("status", "unknown");

        let chips = filters.summary(&defs());
        let labels: Vec<_> = chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Pending", "unknown", "Category A"]);
        assert_eq!(chips[0].filter_label, "Status");
    }

    #[test]
    fn test_option_counts() {
        let rows = vec![
            Record::new().set("status", "active"),
            Record::new().set("status", "active"),
            Record::new().set("status", "pending"),
            Record::new(),
        ];
        let counts = ActiveFilters::option_counts(&rows, &defs()[0]);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_empty_group_imposes_no_constraint() {
        let filters: ActiveFilters =
            serde_json::from_value(serde_json::json!({"status": []})).unwrap();
        assert!(filters.is_empty());
        assert!(filters.matches(&Record::new().set("status", "closed")));
    }

    #[test]
    fn test_serde_transparent() {
        let mut filters = ActiveFilters::new();
        filters.set_group("status", ["pending", "active"]);
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json, serde_json::json!({"status": ["active", "pending"]}));

        let back: ActiveFilters = serde_json::from_value(json).unwrap();
        assert_eq!(back, filters);
    }
}
