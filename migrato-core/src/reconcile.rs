//! Status assignment for scanned migrations.
//!
//! History is the only source of truth for `Applied`. Anything it does not
//! list is `NotApplied`, including entries an executor marked `Failed` during
//! the previous pass.

use crate::{DataSet, HistorySnapshot};

/// Annotates every entry of `data` from `history`.
///
/// Infallible and deterministic: an empty history yields an all `NotApplied`
/// data set.
pub fn merge(mut data: DataSet, history: &HistorySnapshot) -> DataSet {
    for entry in data.entries_mut() {
        match history.get(&entry.name) {
            Some(at) => entry.mark_applied(at),
            None => entry.mark_not_applied(),
        }
    }

    data
}

/// Used when history is unavailable: entries still present in `previous`
/// keep their last known status, new ones stay `NotApplied`.
pub fn retain(mut data: DataSet, previous: Option<&DataSet>) -> DataSet {
    for entry in data.entries_mut() {
        match previous.and_then(|previous| previous.get(&entry.location, &entry.name)) {
            Some(known) => {
                entry.status = known.status;
                entry.applied_at = known.applied_at;
            }
            None => entry.mark_not_applied(),
        }
    }

    data
}
