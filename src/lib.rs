//! # recordstore
//!
//! A snapshot-based record store with:
//! - A line-oriented `id=..,email=..,name=..` text codec
//! - Id-unique record collections with create/update/patch/delete
//! - Interchangeable snapshot backends (flat files, document table, memory)
//! - One load → edit → save cycle per request, nothing saved on failure
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Ingress (CLI / HTTP adapter)                 │
//! │                  Command ──► Response                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Engine                               │
//! │              (load → mutate → encode → save)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────┐
//!   │    Codec    │          │  Collection   │
//!   │ (text ⇄ Vec)│          │ (id-unique)   │
//!   └─────────────┘          └───────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ SnapshotStore │
//!               │ file/doc/mem  │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod collection;
pub mod store;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, StoreError};
pub use config::Config;
pub use record::{Record, RecordId};
pub use store::{DocumentStore, FileStore, MemoryStore, Snapshot, SnapshotInfo, SnapshotStore};
pub use engine::{Engine, Target};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of recordstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
