//! Record definitions
//!
//! The single record shape stored in every snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Record identity (unique within one snapshot)
pub type RecordId = i64;

/// One identity-keyed entry
///
/// `id` is fixed at construction; `email` and `name` may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    pub email: String,
    pub name: String,
}

impl Record {
    /// Create a new record
    pub fn new(id: RecordId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
        }
    }

    /// Get the record id
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Create a record from caller input, rejecting values the codec cannot carry
    pub fn validated(id: RecordId, email: &str, name: &str) -> Result<Self> {
        validate_field("email", email)?;
        validate_field("name", name)?;
        Ok(Self::new(id, email, name))
    }
}

/// Check that a field value survives an encode/decode round trip
///
/// Commas separate pairs and line breaks separate records, so neither may
/// appear inside a value. The decoder trims values, so surrounding
/// whitespace would not survive either.
pub fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| matches!(c, ',' | '\r' | '\n')) {
        return Err(StoreError::InvalidField {
            field,
            reason: format!("must not contain {:?}", c),
        });
    }
    if value.trim() != value {
        return Err(StoreError::InvalidField {
            field,
            reason: "must not start or end with whitespace".to_string(),
        });
    }
    Ok(())
}
