// src/models/mod.rs

//! Domain models for the watcher application.

mod record;
mod selectors;

// Re-export all public types
pub use record::{Record, Snapshot};
pub use selectors::{DetailSelectors, ListingSelectors};
