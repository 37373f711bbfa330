//! Diff calculation between successive snapshots.
//!
//! Novelty is driven by identity alone: a record is new exactly when
//! its id is present in the current snapshot and absent from the
//! previous one. Content changes to an existing id are not novelty.

use crate::models::{Record, Snapshot};

/// Return the records whose id appears in `current` but not `previous`.
///
/// Order of the result is unspecified.
pub fn new_records(previous: &Snapshot, current: &Snapshot) -> Vec<Record> {
    current
        .records()
        .filter(|record| !previous.contains_id(&record.id))
        .cloned()
        .collect()
}
