//! Record and snapshot data structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One listed animal, extracted from its detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Stable identifier from the detail page; the identity key across cycles
    pub id: String,

    /// Display name
    pub name: String,

    /// Breed description
    pub breed: String,

    /// Age description
    pub age: String,

    /// Gender description (empty string when the page omits it)
    pub gender: String,

    /// Shelter location
    pub location: String,

    /// Full URL to the detail page
    pub link: String,

    /// URL of the photo to embed in alert mail
    pub image_url: String,
}

/// All records observed in one fetch cycle, keyed by stable id.
///
/// Built fresh each cycle and swapped in wholesale; never mutated after
/// a cycle completes. A duplicate id within one cycle overwrites the
/// earlier entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    records: HashMap<String, Record>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its id. Last writer wins.
    pub fn insert(&mut self, record: Record) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl FromIterator<Record> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}
