//! Record Collection Module
//!
//! Transient, key-unique working copy of a snapshot's records.
//!
//! ## Responsibilities
//! - Preserve insertion order
//! - Enforce id uniqueness on insert
//! - Locate, overwrite and remove records by id
//!
//! ## Data Structure Choice
//! A plain `Vec<Record>` with linear scans: snapshots are small, order must
//! survive the round trip through the text format, and the collection lives
//! for a single mutation cycle.

mod table;

pub use table::RecordCollection;

/// How `replace_fields` treats the supplied values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Overwrite both fields (PUT semantics)
    Full { email: String, name: String },

    /// Overwrite only the fields given as non-empty values (PATCH semantics)
    Partial {
        email: Option<String>,
        name: Option<String>,
    },
}

impl FieldUpdate {
    /// Build a partial update, treating empty strings as absent
    pub fn partial(email: Option<&str>, name: Option<&str>) -> Self {
        let keep_non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        FieldUpdate::Partial {
            email: keep_non_empty(email),
            name: keep_non_empty(name),
        }
    }
}
