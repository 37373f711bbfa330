//! Pipeline entry points for watcher operations.
//!
//! - `new_records`: identity-only diff between snapshots
//! - `WatchLoop`: the observe-diff-notify cycle driver

pub mod diff;
pub mod watch;

pub use diff::new_records;
pub use watch::{CycleOutcome, WatchLoop, WatchState};
