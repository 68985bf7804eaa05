//! In-memory backend
//!
//! Name-keyed map behind a RwLock. Same upsert semantics as the document
//! backend, nothing touches disk.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

use super::{sort_newest_first, upsert, validate_name, Snapshot, SnapshotInfo, SnapshotStore};

/// Snapshot store kept entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<Snapshot>> {
        validate_name(name)?;
        Ok(self.snapshots.read().get(name).cloned())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<Snapshot> {
        validate_name(snapshot.name())?;
        let stored = upsert(&mut self.snapshots.write(), snapshot);
        tracing::debug!(
            snapshot = stored.name(),
            records = stored.records().len(),
            "Saved snapshot in memory"
        );
        Ok(stored)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.snapshots.write().remove(name).is_some())
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut infos: Vec<SnapshotInfo> = self.snapshots.read().values().map(Snapshot::info).collect();
        sort_newest_first(&mut infos);
        Ok(infos)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
