//! File backend
//!
//! One text file per snapshot under a root directory. The file holds the
//! snapshot's raw text and nothing else; identity and timestamps are derived
//! from the name and from filesystem metadata.
//!
//! Saves are written to `{root}/.staging/{name}`, synced, then renamed over
//! the snapshot file, so a failed save leaves the previous content intact.
//! The rename gives the file a new birth time; `created_at` therefore
//! follows the last save for files this store has written.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec;
use crate::config::Config;
use crate::error::{Result, StoreError};

use super::{sort_newest_first, validate_name, Snapshot, SnapshotInfo, SnapshotStore};

/// Subdirectory of the root holding half-written snapshot files
pub const STAGING_DIR: &str = ".staging";

/// Snapshot store backed by flat text files
pub struct FileStore {
    /// Directory holding one file per snapshot
    root: PathBuf,

    /// fsync each file after writing
    sync_writes: bool,
}

impl FileStore {
    /// Open or create a file store rooted at `config.data_dir`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        Ok(Self {
            root: config.data_dir.clone(),
            sync_writes: config.sync_writes,
        })
    }

    /// Open with a path (convenience method)
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&Config::builder().data_dir(path).build())
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a snapshot name
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        if name == STAGING_DIR {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    /// Stable identity for a snapshot name
    ///
    /// "users.txt" always maps to the same UUID, across processes.
    pub fn identity_for(name: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write the staged file completely, then move it over `path`
    fn write_atomically(&self, path: &Path, snapshot: &Snapshot) -> Result<()> {
        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&staging)?;
        let temp_path = staging.join(snapshot.name());

        let written = self
            .write_staged(&temp_path, snapshot)
            .and_then(|()| fs::rename(&temp_path, path).map_err(StoreError::from));

        if written.is_err() {
            if let Err(e) = fs::remove_file(&temp_path) {
                tracing::debug!(path = %temp_path.display(), error = %e, "Staged file not removed");
            }
        }
        written
    }

    fn write_staged(&self, temp_path: &Path, snapshot: &Snapshot) -> Result<()> {
        let mut file = File::create(temp_path)?;
        file.write_all(snapshot.raw_text().as_bytes())?;
        file.set_modified(SystemTime::from(snapshot.last_modified_at()))?;
        if self.sync_writes {
            file.sync_all()?;
        }
        Ok(())
    }

    /// (created, modified) from file metadata
    ///
    /// Filesystems without birth time report the modification time twice.
    /// A file first written after its modification stamp was taken is
    /// clamped so `created <= modified`.
    fn timestamps(file: &File) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let metadata = file.metadata()?;
        let modified = metadata.modified()?;
        let created = metadata
            .created()
            .map(|created| created.min(modified))
            .unwrap_or(modified);
        Ok((created.into(), modified.into()))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, name: &str) -> Result<Option<Snapshot>> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            tracing::debug!(snapshot = name, "No snapshot file");
            return Ok(None);
        }

        let file = File::open(&path)?;
        let (created_at, last_modified_at) = Self::timestamps(&file)?;
        let bytes = fs::read(&path)?;
        let raw_text = std::str::from_utf8(&bytes)?;
        let records = codec::decode(raw_text)?;

        tracing::debug!(snapshot = name, records = records.len(), "Loaded snapshot file");

        Ok(Some(Snapshot::from_parts(
            Self::identity_for(name),
            name,
            records,
            raw_text,
            created_at,
            last_modified_at,
        )))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<Snapshot> {
        let path = self.path_for(snapshot.name())?;
        fs::create_dir_all(&self.root)?;
        self.write_atomically(&path, snapshot)?;

        let (created_at, _) = Self::timestamps(&File::open(&path)?)?;
        let mut stored = snapshot.clone();
        stored.adopt_identity(Self::identity_for(snapshot.name()), created_at);

        tracing::debug!(
            snapshot = snapshot.name(),
            path = %path.display(),
            records = snapshot.records().len(),
            "Saved snapshot file"
        );

        Ok(stored)
    }

    fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        tracing::debug!(snapshot = name, "Removed snapshot file");
        Ok(true)
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>> {
        let mut infos = Vec::new();

        if !self.root.is_dir() {
            return Ok(infos);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match self.load(name) {
                Ok(Some(snapshot)) => infos.push(snapshot.info()),
                Ok(None) => {}
                Err(e) if e.is_client_error() => {
                    tracing::warn!(file = name, error = %e, "Skipping file that is not a snapshot");
                }
                Err(e) => return Err(e),
            }
        }

        sort_newest_first(&mut infos);
        Ok(infos)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
