//! Configuration for recordstore
//!
//! Centralized configuration with sensible defaults. Stores receive a `Config`
//! at construction; nothing reads ambient state.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Main configuration for a recordstore backend
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {snapshot name}    (file backend, one text file per snapshot)
    ///     └── documents/
    ///         └── {collection}.db  (document backend table)
    pub data_dir: PathBuf,

    /// Logical table name for the document backend
    pub collection: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fsync after every save
    pub sync_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./recordstore_data"),
            collection: "snapshots".to_string(),
            sync_writes: true,
        }
    }
}

impl Config {
    /// Subdirectory of `data_dir` holding document tables
    pub const DOCUMENTS_DIR: &'static str = "documents";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the document backend's table file
    pub fn collection_path(&self) -> PathBuf {
        self.data_dir
            .join(Self::DOCUMENTS_DIR)
            .join(format!("{}.db", self.collection))
    }

    /// Reject configurations no backend can work with
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(StoreError::Config("data_dir must not be empty".to_string()));
        }
        let collection = self.collection.as_str();
        if collection.is_empty()
            || collection.contains(['/', '\\', '\0'])
            || collection.starts_with('.')
        {
            return Err(StoreError::Config(format!(
                "invalid collection name: {:?}",
                collection
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the document collection name
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Enable or disable fsync after every save
    pub fn sync_writes(mut self, enabled: bool) -> Self {
        self.config.sync_writes = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
