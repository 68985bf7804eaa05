//! Engine Module
//!
//! Runs the mutation cycle over a snapshot store.
//!
//! ## Responsibilities
//! - Load a snapshot, or initialize it from uploaded content on first contact
//! - Apply one collection-level operation to a working copy
//! - Re-encode, stamp and save only when the operation succeeded
//! - Answer read-only queries (describe, records, list)
//!
//! ## Mutation Cycle
//! ```text
//!  load(name) ──none──► decode(upload) ──► fresh snapshot
//!      │                                        │
//!      └──────────────some──────────────────────┤
//!                                               ▼
//!                               apply op to RecordCollection
//!                                   │ err: return, nothing saved
//!                                   ▼ ok
//!                        encode ─► stamp lastModifiedAt ─► save
//! ```

use std::path::Path;

use crate::codec;
use crate::collection::{FieldUpdate, RecordCollection};
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::protocol::{Command, Operation};
use crate::record::{validate_field, Record, RecordId};
use crate::store::{
    validate_name, DocumentStore, FileStore, Snapshot, SnapshotInfo, SnapshotStore,
};

/// Which snapshot a request targets, plus uploaded content if the caller has any
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Snapshot name (the uploaded file name)
    pub name: &'a str,

    /// Raw uploaded bytes; only consulted when the snapshot is not stored yet
    /// (and by `upload`)
    pub upload: Option<&'a [u8]>,
}

impl<'a> Target<'a> {
    /// Target an existing snapshot
    pub fn named(name: &'a str) -> Self {
        Self { name, upload: None }
    }

    /// Target a snapshot, supplying content for first contact
    pub fn with_upload(name: &'a str, upload: &'a [u8]) -> Self {
        Self {
            name,
            upload: Some(upload),
        }
    }
}

/// Result of a successful mutation
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// Human-readable message
    pub message: String,

    /// Record the mutation touched
    pub record_id: RecordId,

    /// What was done
    pub operation: Operation,

    /// The snapshot as saved
    pub snapshot: SnapshotInfo,
}

/// Result of an upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// The snapshot as saved
    pub snapshot: SnapshotInfo,

    /// Records decoded from the upload
    pub records: Vec<Record>,

    /// True if the name was new to the store
    pub created: bool,
}

/// Result of `Engine::execute`
#[derive(Debug, Clone)]
pub enum Outcome {
    Uploaded(UploadOutcome),
    Confirmed(Confirmation),
    Described(SnapshotInfo),
}

/// The record store engine
///
/// ## Concurrency Model
///
/// Each call is one independent load → edit → save cycle with no lock held
/// across it. Two concurrent mutations of the same snapshot may race and the
/// later save wins. Callers that need serializability must serialize calls
/// per snapshot name themselves.
pub struct Engine {
    store: Box<dyn SnapshotStore>,
}

impl Engine {
    /// Create an engine over any backend
    pub fn new<S: SnapshotStore + 'static>(store: S) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Create an engine over an already boxed backend
    pub fn from_boxed(store: Box<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Open an engine over the file backend
    pub fn open_file(config: &Config) -> Result<Self> {
        Ok(Self::new(FileStore::open(config)?))
    }

    /// Open an engine over the document backend
    pub fn open_document(config: &Config) -> Result<Self> {
        Ok(Self::new(DocumentStore::open(config)?))
    }

    /// Open a file-backed engine with a path (convenience method)
    pub fn open_path(path: &Path) -> Result<Self> {
        Ok(Self::new(FileStore::open_path(path)?))
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, target: Target<'_>, command: &Command) -> Result<Outcome> {
        match command {
            Command::Upload => {
                let upload = target.upload.ok_or_else(|| StoreError::MissingUpload {
                    name: target.name.to_string(),
                })?;
                self.upload(target.name, upload).map(Outcome::Uploaded)
            }
            Command::Create { id, email, name } => self
                .create_record(target, *id, email, name)
                .map(Outcome::Confirmed),
            Command::Update { id, email, name } => self
                .full_update(target, *id, email, name)
                .map(Outcome::Confirmed),
            Command::Patch { id, email, name } => self
                .partial_update(target, *id, email.as_deref(), name.as_deref())
                .map(Outcome::Confirmed),
            Command::Delete { id } => self.delete_record(target, *id).map(Outcome::Confirmed),
            Command::Describe => self.describe(target.name).map(Outcome::Described),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Decode uploaded content and store it under `name`
    ///
    /// An existing snapshot keeps its identity and `created_at`; its records
    /// and raw text are replaced by the upload.
    pub fn upload(&self, name: &str, bytes: &[u8]) -> Result<UploadOutcome> {
        validate_name(name)?;
        let raw_text = std::str::from_utf8(bytes)?;
        let records = codec::decode(raw_text)?;

        let (snapshot, created) = match self.store.load(name)? {
            Some(mut existing) => {
                existing.resync(raw_text, records.clone());
                (existing, false)
            }
            None => (Snapshot::new(name, records.clone(), raw_text), true),
        };

        let stored = self.store.save(&snapshot)?;

        if created {
            tracing::info!(snapshot = name, records = records.len(), "New snapshot stored");
        } else {
            tracing::info!(snapshot = name, records = records.len(), "Snapshot refreshed from upload");
        }

        Ok(UploadOutcome {
            snapshot: stored.info(),
            records,
            created,
        })
    }

    /// Insert a new record
    pub fn create_record(
        &self,
        target: Target<'_>,
        id: RecordId,
        email: &str,
        name: &str,
    ) -> Result<Confirmation> {
        let record = Record::validated(id, email, name)?;

        let stored = self.mutate(target, |records| records.insert(record))?;

        Ok(self.confirm(
            Operation::Create,
            id,
            format!("Record created successfully. Stored in snapshot: {}", target.name),
            &stored,
        ))
    }

    /// Overwrite both fields of an existing record
    pub fn full_update(
        &self,
        target: Target<'_>,
        id: RecordId,
        email: &str,
        name: &str,
    ) -> Result<Confirmation> {
        validate_field("email", email)?;
        validate_field("name", name)?;

        let update = FieldUpdate::Full {
            email: email.to_string(),
            name: name.to_string(),
        };
        let stored = self.mutate(target, |records| records.replace_fields(id, update).map(|_| ()))?;

        Ok(self.confirm(
            Operation::Update,
            id,
            format!(
                "Record with ID {} updated successfully. Updated snapshot: {}",
                id, target.name
            ),
            &stored,
        ))
    }

    /// Overwrite only the supplied non-empty fields of an existing record
    ///
    /// Always saves, even when neither field is supplied: a no-op patch still
    /// advances `last_modified_at`.
    pub fn partial_update(
        &self,
        target: Target<'_>,
        id: RecordId,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Confirmation> {
        if let Some(email) = email {
            validate_field("email", email)?;
        }
        if let Some(name) = name {
            validate_field("name", name)?;
        }

        let update = FieldUpdate::partial(email, name);
        let stored = self.mutate(target, |records| records.replace_fields(id, update).map(|_| ()))?;

        Ok(self.confirm(
            Operation::Patch,
            id,
            format!(
                "Record with ID {} partially updated successfully. Updated snapshot: {}",
                id, target.name
            ),
            &stored,
        ))
    }

    /// Remove a record
    pub fn delete_record(&self, target: Target<'_>, id: RecordId) -> Result<Confirmation> {
        let stored = self.mutate(target, |records| records.remove(id).map(|_| ()))?;

        Ok(self.confirm(
            Operation::Delete,
            id,
            format!(
                "Record with ID {} deleted successfully. Updated snapshot: {}",
                id, target.name
            ),
            &stored,
        ))
    }

    /// Explicitly delete a whole snapshot
    pub fn drop_snapshot(&self, name: &str) -> Result<()> {
        if !self.store.remove(name)? {
            return Err(StoreError::SnapshotNotFound {
                name: name.to_string(),
            });
        }
        tracing::info!(snapshot = name, "Snapshot dropped");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Identity, record count and timestamps of a stored snapshot
    pub fn describe(&self, name: &str) -> Result<SnapshotInfo> {
        Ok(self.load_existing(name)?.info())
    }

    /// Records of a stored snapshot, in order
    pub fn records(&self, name: &str) -> Result<Vec<Record>> {
        Ok(self.load_existing(name)?.records().to_vec())
    }

    /// All stored snapshots, newest first
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        self.store.list()
    }

    /// Get the backend
    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// One mutation cycle: load-or-initialize, apply, re-encode, save
    fn mutate<F>(&self, target: Target<'_>, apply: F) -> Result<Snapshot>
    where
        F: FnOnce(&mut RecordCollection) -> Result<()>,
    {
        let mut snapshot = self.load_or_initialize(target)?;

        let mut records = snapshot.collection();
        apply(&mut records)?;
        snapshot.set_records(records.into_records());

        self.store.save(&snapshot)
    }

    /// Load a snapshot, or build a fresh one from the upload if the store has none
    fn load_or_initialize(&self, target: Target<'_>) -> Result<Snapshot> {
        validate_name(target.name)?;

        if let Some(snapshot) = self.store.load(target.name)? {
            return Ok(snapshot);
        }

        let upload = target.upload.ok_or_else(|| StoreError::SnapshotNotFound {
            name: target.name.to_string(),
        })?;
        let raw_text = std::str::from_utf8(upload)?;
        let records = codec::decode(raw_text)?;

        tracing::debug!(
            snapshot = target.name,
            backend = self.store.backend_name(),
            records = records.len(),
            "Initializing snapshot from upload"
        );

        Ok(Snapshot::new(target.name, records, raw_text))
    }

    fn load_existing(&self, name: &str) -> Result<Snapshot> {
        self.store
            .load(name)?
            .ok_or_else(|| StoreError::SnapshotNotFound {
                name: name.to_string(),
            })
    }

    fn confirm(
        &self,
        operation: Operation,
        record_id: RecordId,
        message: String,
        stored: &Snapshot,
    ) -> Confirmation {
        tracing::debug!(
            snapshot = stored.name(),
            backend = self.store.backend_name(),
            operation = %operation,
            record_id,
            "Mutation saved"
        );

        Confirmation {
            message,
            record_id,
            operation,
            snapshot: stored.info(),
        }
    }
}
