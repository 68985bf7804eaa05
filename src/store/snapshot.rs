//! Snapshot definitions
//!
//! A named record list together with its raw text and timestamps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec;
use crate::collection::RecordCollection;
use crate::record::Record;

/// One named, persisted collection of records
///
/// `records` and `raw_text` are only ever replaced together, and every
/// replacement advances `last_modified_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    id: Uuid,
    name: String,
    records: Vec<Record>,
    raw_text: String,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot that has not been persisted yet
    ///
    /// `raw_text` is kept verbatim; both timestamps are set to now.
    pub fn new(name: impl Into<String>, records: Vec<Record>, raw_text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            records,
            raw_text: raw_text.into(),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Reassemble a snapshot from stored parts (used by backends on load)
    pub fn from_parts(
        id: Uuid,
        name: impl Into<String>,
        records: Vec<Record>,
        raw_text: impl Into<String>,
        created_at: DateTime<Utc>,
        last_modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            records,
            raw_text: raw_text.into(),
            created_at,
            last_modified_at,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replace the record list, re-encoding the raw text from it
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.raw_text = codec::encode(&records);
        self.records = records;
        self.touch();
    }

    /// Replace both the raw text and the records decoded from it
    ///
    /// Used when a caller re-uploads content; the text is kept verbatim.
    pub fn resync(&mut self, raw_text: impl Into<String>, records: Vec<Record>) {
        self.raw_text = raw_text.into();
        self.records = records;
        self.touch();
    }

    /// Adopt the identity and creation time of an already-stored snapshot
    pub(crate) fn adopt_identity(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    /// Mark the current modification stamp as the creation time
    pub(crate) fn mark_created(&mut self) {
        self.created_at = self.last_modified_at;
    }

    /// Advance `last_modified_at`, strictly past its previous value
    fn touch(&mut self) {
        let now = Utc::now();
        self.last_modified_at = if now > self.last_modified_at {
            now
        } else {
            self.last_modified_at + Duration::microseconds(1)
        };
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// Copy the records into a working collection
    pub fn collection(&self) -> RecordCollection {
        RecordCollection::from_records(self.records.clone())
    }

    /// Summary used by `describe` and listings
    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            id: self.id,
            name: self.name.clone(),
            record_count: self.records.len(),
            created_at: self.created_at,
            last_modified_at: self.last_modified_at,
        }
    }
}

/// Read-only summary of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: Uuid,
    pub name: String,
    pub record_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}
