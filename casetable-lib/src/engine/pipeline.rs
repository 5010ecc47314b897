//! Pure derivation of the filtered and sorted row order.

use crate::path::Resolve;
use crate::query::ActiveFilters;
use crate::query::SearchMatcher;
use crate::query::SortState;
use crate::query::sorted_order;

/// Inputs of one derivation pass.
pub(crate) struct Query<'a> {
    pub search: SearchMatcher<'a>,
    pub filters: &'a ActiveFilters,
    pub sort: &'a SortState,
}

/// Indices into `records` that pass search and filters, in sorted order.
///
/// `records` is only read. With no sort field, indices keep their incoming
/// order.
pub(crate) fn derive<T: Resolve>(records: &[T], query: &Query<'_>) -> Vec<usize> {
    let matching: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, row)| query.search.matches(*row))
        .filter(|(_, row)| query.filters.matches(*row))
        .map(|(i, _)| i)
        .collect();

    let Some(field) = query.sort.field.as_deref() else {
        return matching;
    };
    let keys: Vec<_> = matching.iter().map(|&i| records[i].resolve(field)).collect();
    sorted_order(&keys, query.sort.direction)
        .into_iter()
        .map(|position| matching[position])
        .collect()
}
