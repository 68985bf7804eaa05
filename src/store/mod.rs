//! Snapshot Store Module
//!
//! Persistence abstraction over "where snapshots live".
//!
//! ## Responsibilities
//! - Load a snapshot by name, or report that none exists
//! - Save a snapshot durably, reconciling create vs update
//! - List and explicitly remove snapshots
//!
//! ## Backends
//! ```text
//!                 ┌─────────────────┐
//!                 │  SnapshotStore  │
//!                 └────────┬────────┘
//!        ┌─────────────────┼─────────────────┐
//!        ▼                 ▼                 ▼
//! ┌─────────────┐  ┌───────────────┐  ┌─────────────┐
//! │  FileStore  │  │ DocumentStore │  │ MemoryStore │
//! │ (text file  │  │ (keyed table, │  │ (keyed map, │
//! │  per name)  │  │  one .db file)│  │  no disk)   │
//! └─────────────┘  └───────────────┘  └─────────────┘
//! ```
//!
//! The backend is picked by whoever constructs the engine; the engine never
//! branches on it.

mod snapshot;
mod file;
mod document;
mod memory;

use std::collections::HashMap;

pub use snapshot::{Snapshot, SnapshotInfo};
pub use file::{FileStore, STAGING_DIR};
pub use document::DocumentStore;
pub use memory::MemoryStore;

use crate::error::{Result, StoreError};

/// Capability set shared by every backend
///
/// Implementations must make `save` durable before returning and have `load`
/// return the most recently saved state.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot with this name, if any
    fn load(&self, name: &str) -> Result<Option<Snapshot>>;

    /// Persist a snapshot, returning it as stored
    ///
    /// If a snapshot with the same name exists its identity and `created_at`
    /// are kept; otherwise `created_at` is set to the snapshot's
    /// `last_modified_at`.
    fn save(&self, snapshot: &Snapshot) -> Result<Snapshot>;

    /// Delete a snapshot; returns whether one existed
    fn remove(&self, name: &str) -> Result<bool>;

    /// Summaries of all snapshots, newest `created_at` first
    fn list(&self) -> Result<Vec<SnapshotInfo>>;

    /// Short backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Check that a snapshot name is usable as a key and as a file name
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Upsert into a name-keyed table, returning the stored snapshot
pub(crate) fn upsert(table: &mut HashMap<String, Snapshot>, snapshot: &Snapshot) -> Snapshot {
    let stored = reconcile(table.get(snapshot.name()), snapshot);
    table.insert(stored.name().to_string(), stored.clone());
    stored
}

/// Merge an incoming snapshot with the stored one (if any)
pub(crate) fn reconcile(existing: Option<&Snapshot>, incoming: &Snapshot) -> Snapshot {
    let mut stored = incoming.clone();
    match existing {
        Some(existing) => stored.adopt_identity(existing.id(), existing.created_at()),
        None => stored.mark_created(),
    }
    stored
}

/// Sort summaries newest first, breaking ties by name
pub(crate) fn sort_newest_first(infos: &mut [SnapshotInfo]) {
    infos.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}
