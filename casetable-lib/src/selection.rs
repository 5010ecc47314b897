//! Row selection by identifier.
//!
//! Selection uses string ids for stability across filtering, sorting and
//! record replacement. Ids that drop out of the filtered rows stay selected.

use std::collections::HashSet;

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection from initial ids.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        let mut removed: Vec<_> = self.selected.drain().collect();
        removed.sort();
        removed
    }

    /// Toggle selection of an ID.
    /// Returns (added, removed) IDs.
    pub fn toggle(&mut self, id: &str) -> (Vec<String>, Vec<String>) {
        if self.selected.remove(id) {
            (vec![], vec![id.to_string()])
        } else {
            self.selected.insert(id.to_string());
            (vec![id.to_string()], vec![])
        }
    }

    /// Select all items from the provided list of IDs.
    /// Returns the IDs that were newly selected.
    pub fn select_all(&mut self, all_ids: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for id in all_ids {
            if self.selected.insert(id.clone()) {
                added.push(id.clone());
            }
        }
        added
    }

    /// Header checkbox toggle for the visible rows.
    ///
    /// Clears everything when exactly the visible rows are selected,
    /// otherwise makes the selection exactly the visible rows. Ids selected
    /// outside the visible rows are dropped in the second case, so an empty
    /// visible set clears the selection.
    ///
    /// Returns (added, removed) IDs.
    pub fn toggle_all(&mut self, visible_ids: &[String]) -> (Vec<String>, Vec<String>) {
        if self.is_all_selected(visible_ids) {
            return (vec![], self.clear());
        }
        let visible: HashSet<&str> = visible_ids.iter().map(String::as_str).collect();
        let mut removed: Vec<_> = self
            .selected
            .iter()
            .filter(|id| !visible.contains(id.as_str()))
            .cloned()
            .collect();
        removed.sort();
        self.selected.retain(|id| visible.contains(id.as_str()));
        let added = self.select_all(visible_ids);
        (added, removed)
    }

    /// `true` when the selection is exactly the (non-empty) visible rows.
    pub fn is_all_selected(&self, visible_ids: &[String]) -> bool {
        !visible_ids.is_empty()
            && self.selected.len() == visible_ids.len()
            && visible_ids.iter().all(|id| self.selected.contains(id))
    }

    /// `true` when some but not all visible rows are selected.
    pub fn is_partially_selected(&self, visible_ids: &[String]) -> bool {
        let count = visible_ids
            .iter()
            .filter(|id| self.selected.contains(*id))
            .count();
        count > 0 && count < visible_ids.len()
    }
}
