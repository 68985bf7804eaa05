//! Document backend
//!
//! A persistent name-keyed table of snapshot documents, stored in a single
//! file. Every operation re-reads the file so that several stores (or
//! processes) on one collection see each other's saves; a change merges one
//! document into the freshly read table and rewrites the whole file.
//!
//! ## File Format
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬─────────────────────────┐
//! │Magic (4) │Version(2)│  Len (4) │ CRC32 (4)│ Payload (bincode docs)  │
//! └──────────┴──────────┴──────────┴──────────┴─────────────────────────┘
//! ```
//! Integers are little-endian. The payload is the list of documents sorted
//! by name; the CRC covers the payload only.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{Result, StoreError};

use super::{
    reconcile, sort_newest_first, validate_name, Snapshot, SnapshotInfo, SnapshotStore,
};

/// Magic bytes at the start of a document table
pub const MAGIC: &[u8; 4] = b"RSDT";

/// Current table format version
pub const VERSION: u16 = 1;

/// Header size: magic (4) + version (2) + payload length (4) + crc (4)
pub const HEADER_SIZE: usize = 14;

/// Snapshot store backed by a persistent document table
///
/// ## Concurrency:
/// - `documents`: Mutex over the last table read from disk
/// - A save holds the lock across re-read, merge and rewrite, so it never
///   drops documents written by other stores on the same collection
/// - Between processes only the same-name lost update remains: the
///   re-read happens immediately before the rewrite
pub struct DocumentStore {
    /// Table file path ({data_dir}/documents/{collection}.db)
    path: PathBuf,

    /// fsync the table file after each rewrite
    sync_writes: bool,

    /// All documents keyed by snapshot name (unique), as last read or written
    documents: Mutex<HashMap<String, Snapshot>>,
}

impl DocumentStore {
    /// Open or create the document table described by `config`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let path = config.collection_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let documents = if path.exists() {
            Self::read_table(&path)?
        } else {
            HashMap::new()
        };

        tracing::debug!(
            path = %path.display(),
            documents = documents.len(),
            "Opened document table"
        );

        Ok(Self {
            path,
            sync_writes: config.sync_writes,
            documents: Mutex::new(documents),
        })
    }

    /// Path of the table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize> {
        Ok(self.refreshed()?.len())
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Lock the table after replacing it with the current file contents
    fn refreshed(&self) -> Result<MutexGuard<'_, HashMap<String, Snapshot>>> {
        let mut documents = self.documents.lock();
        *documents = if self.path.exists() {
            Self::read_table(&self.path)?
        } else {
            HashMap::new()
        };
        Ok(documents)
    }

    /// Read and verify a table file
    fn read_table(path: &Path) -> Result<HashMap<String, Snapshot>> {
        let bytes = fs::read(path)?;

        let documents: Vec<Snapshot> = match Self::decode_table(&bytes) {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Document table rejected");
                return Err(e);
            }
        };

        Ok(documents
            .into_iter()
            .map(|doc| (doc.name().to_string(), doc))
            .collect())
    }

    /// Verify the header and checksum, then deserialize the payload
    fn decode_table(bytes: &[u8]) -> Result<Vec<Snapshot>> {
        if bytes.len() < HEADER_SIZE {
            return Err(StoreError::Corruption(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(StoreError::Corruption("Invalid magic number".to_string()));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(StoreError::Corruption(format!(
                "Unsupported table version: {}",
                version
            )));
        }

        let payload_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        let expected_crc = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != payload_len {
            return Err(StoreError::Corruption(format!(
                "Payload length mismatch: header says {}, found {}",
                payload_len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(StoreError::Corruption(format!(
                "Checksum mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        Ok(bincode::deserialize(payload)?)
    }

    /// Serialize the table with header and checksum
    fn encode_table(documents: &HashMap<String, Snapshot>) -> Result<Vec<u8>> {
        let mut sorted: Vec<&Snapshot> = documents.values().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));

        let payload = bincode::serialize(&sorted)?;
        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            StoreError::Serialization(format!(
                "Document table too large: {} bytes",
                payload.len()
            ))
        })?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload_len.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Rewrite the table file: temp file, optional fsync, then rename
    fn write_table(&self, documents: &HashMap<String, Snapshot>) -> Result<()> {
        let bytes = Self::encode_table(documents)?;
        let temp_path = self.path.with_extension("db.tmp");

        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            writer.write_all(&bytes)?;
            writer.flush()?;
            if self.sync_writes {
                writer.get_ref().sync_all()?;
            }
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl SnapshotStore for DocumentStore {
    fn load(&self, name: &str) -> Result<Option<Snapshot>> {
        validate_name(name)?;
        let snapshot = self.refreshed()?.get(name).cloned();
        tracing::debug!(snapshot = name, found = snapshot.is_some(), "Loaded document");
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<Snapshot> {
        validate_name(snapshot.name())?;

        let mut documents = self.refreshed()?;
        let stored = reconcile(documents.get(snapshot.name()), snapshot);
        let name = stored.name().to_string();

        // Merge, persist, and roll back the in-memory table if the write fails
        let previous = documents.insert(name.clone(), stored.clone());
        if let Err(e) = self.write_table(&documents) {
            match previous {
                Some(previous) => documents.insert(name, previous),
                None => documents.remove(&name),
            };
            return Err(e);
        }

        tracing::debug!(
            snapshot = %name,
            id = %stored.id(),
            records = stored.records().len(),
            inserted = previous.is_none(),
            "Saved document"
        );

        Ok(stored)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        validate_name(name)?;

        let mut documents = self.refreshed()?;
        let Some(removed) = documents.remove(name) else {
            return Ok(false);
        };

        if let Err(e) = self.write_table(&documents) {
            documents.insert(name.to_string(), removed);
            return Err(e);
        }

        tracing::debug!(snapshot = name, "Removed document");
        Ok(true)
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut infos: Vec<SnapshotInfo> = self.refreshed()?.values().map(Snapshot::info).collect();
        sort_newest_first(&mut infos);
        Ok(infos)
    }

    fn backend_name(&self) -> &'static str {
        "document"
    }
}
