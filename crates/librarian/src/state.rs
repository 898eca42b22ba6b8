//! Persisted reconciliation state
//!
//! The state maps each tracked item name to what the item looked like at the
//! end of the last successful pass: a single mtime for a file item, or a
//! relative path → mtime map for a directory item. It is the baseline of the
//! next pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EntryType;
use crate::sync::{Snapshot, Timestamp};

/// Recorded state of one tracked item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemState {
    /// Plain file item: its modification time
    File(Timestamp),
    /// Directory item: mtime of every file below it
    Directory(BTreeMap<String, Timestamp>),
}

impl ItemState {
    /// Entry type this state describes
    #[must_use]
    pub const fn entry_type(&self) -> EntryType {
        match self {
            Self::File(_) => EntryType::File,
            Self::Directory(_) => EntryType::Directory,
        }
    }

    /// Rebuild the baseline snapshot of a directory item
    #[must_use]
    pub fn to_snapshot(&self) -> Option<Snapshot> {
        match self {
            Self::File(_) => None,
            Self::Directory(files) => Some(Snapshot::from_map(files.clone())),
        }
    }
}

impl From<Snapshot> for ItemState {
    fn from(snapshot: Snapshot) -> Self {
        Self::Directory(snapshot.into_files())
    }
}

/// State of every tracked item after a pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState {
    items: BTreeMap<String, ItemState>,
}

impl SyncState {
    /// Create an empty state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Recorded state of an item
    #[must_use]
    pub fn get(&self, item: &str) -> Option<&ItemState> {
        self.items.get(item)
    }

    /// Record the state of an item, returning the previous entry
    pub fn insert(&mut self, item: impl Into<String>, state: ItemState) -> Option<ItemState> {
        self.items.insert(item.into(), state)
    }

    /// Number of recorded items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<(String, ItemState)> for SyncState {
    fn from_iter<I: IntoIterator<Item = (String, ItemState)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
