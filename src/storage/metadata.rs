//! Store file envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::{DisabledStore, Entry, EntryConvertable, FilterStore};

/// Store file format version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub filters: Vec<Entry>,
    pub disabled: Vec<Entry>,
}

impl StoreFile {
    /// Snapshot both stores as of now
    pub fn capture(filters: &FilterStore, disabled: &DisabledStore) -> Self {
        Self {
            version: STORE_VERSION,
            saved_at: Utc::now(),
            filters: filters.get().iter().map(EntryConvertable::to_entry).collect(),
            disabled: disabled.get().iter().map(EntryConvertable::to_entry).collect(),
        }
    }
}
