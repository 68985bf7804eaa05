//! Command definitions
//!
//! Represents one request against a named snapshot.

use serde::Serialize;

use crate::record::RecordId;

/// Operation names as reported back to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Upload,
    Create,
    Update,
    Patch,
    Delete,
    Describe,
}

impl Operation {
    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Upload => "UPLOAD",
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Patch => "PATCH",
            Operation::Delete => "DELETE",
            Operation::Describe => "DESCRIBE",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode uploaded content and store or refresh the snapshot
    Upload,

    /// Insert a new record
    Create {
        id: RecordId,
        email: String,
        name: String,
    },

    /// Overwrite both fields of a record
    Update {
        id: RecordId,
        email: String,
        name: String,
    },

    /// Overwrite only the supplied non-empty fields
    Patch {
        id: RecordId,
        email: Option<String>,
        name: Option<String>,
    },

    /// Remove a record
    Delete { id: RecordId },

    /// Read snapshot metadata
    Describe,
}

impl Command {
    /// Get the operation
    pub fn operation(&self) -> Operation {
        match self {
            Command::Upload => Operation::Upload,
            Command::Create { .. } => Operation::Create,
            Command::Update { .. } => Operation::Update,
            Command::Patch { .. } => Operation::Patch,
            Command::Delete { .. } => Operation::Delete,
            Command::Describe => Operation::Describe,
        }
    }

    /// Record targeted by this command, if any
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Command::Create { id, .. }
            | Command::Update { id, .. }
            | Command::Patch { id, .. }
            | Command::Delete { id } => Some(*id),
            Command::Upload | Command::Describe => None,
        }
    }

    /// Whether the command writes to the store
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Describe)
    }
}
