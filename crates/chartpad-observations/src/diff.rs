//! Changed-field detection against the snapshot taken at initial load.

use crate::entry::ObservationEntry;

/// Positions of observations whose value differs from the original
/// snapshot. Lists are compared by position; only these positions are
/// eligible for submission.
pub fn diff(original: &[ObservationEntry], updated: &[ObservationEntry]) -> Vec<usize> {
    updated
        .iter()
        .enumerate()
        .filter(|(index, entry)| {
            original
                .get(*index)
                .map(|o| o.value != entry.value)
                .unwrap_or(true)
        })
        .map(|(index, _)| index)
        .collect()
}

/// The changed entries themselves, in list order.
pub fn changed_entries<'a>(
    original: &[ObservationEntry],
    updated: &'a [ObservationEntry],
) -> Vec<&'a ObservationEntry> {
    diff(original, updated)
        .into_iter()
        .filter_map(|index| updated.get(index))
        .collect()
}
