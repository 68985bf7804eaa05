//! RecordCollection implementation
//!
//! Vec-backed ordered collection keyed by record id.

use crate::error::{Result, StoreError};
use crate::record::{Record, RecordId};

use super::FieldUpdate;

/// Ordered, key-unique sequence of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-consistent record list (e.g. a loaded snapshot)
    ///
    /// Uniqueness is not re-checked; loaded snapshots are trusted.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Index of the first record with this id
    pub fn find(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Get a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.find(id).map(|i| &self.records[i])
    }

    /// Append a record, rejecting a duplicate id
    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.find(record.id()).is_some() {
            return Err(StoreError::DuplicateKey { id: record.id() });
        }
        self.records.push(record);
        Ok(())
    }

    /// Overwrite fields of the record with this id
    ///
    /// Returns the record as it is after the update.
    pub fn replace_fields(&mut self, id: RecordId, update: FieldUpdate) -> Result<&Record> {
        let index = self.find(id).ok_or(StoreError::RecordNotFound { id })?;
        let record = &mut self.records[index];

        match update {
            FieldUpdate::Full { email, name } => {
                record.email = email;
                record.name = name;
            }
            FieldUpdate::Partial { email, name } => {
                if let Some(email) = email.filter(|s| !s.is_empty()) {
                    record.email = email;
                }
                if let Some(name) = name.filter(|s| !s.is_empty()) {
                    record.name = name;
                }
            }
        }

        Ok(&self.records[index])
    }

    /// Remove the record with this id, keeping the order of the rest
    pub fn remove(&mut self, id: RecordId) -> Result<Record> {
        let index = self.find(id).ok_or(StoreError::RecordNotFound { id })?;
        Ok(self.records.remove(index))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Borrow the records as a slice
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Consume the collection, returning the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl From<Vec<Record>> for RecordCollection {
    fn from(records: Vec<Record>) -> Self {
        Self::from_records(records)
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
