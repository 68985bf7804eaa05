//! Snapshot decoding
//!
//! Parses snapshot text into records, one line at a time.

use crate::error::{Result, StoreError};
use crate::record::{Record, RecordId};

use super::{EMAIL_KEY, ID_KEY, KEY_VALUE_SEPARATOR, NAME_KEY, PAIR_SEPARATOR};

/// Decode snapshot text into an ordered record list
///
/// Blank and whitespace-only lines are skipped. Fails on the first
/// malformed line.
pub fn decode(text: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(decode_line(line, index + 1)?);
    }

    Ok(records)
}

/// Decode raw uploaded bytes (must be UTF-8)
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<Record>> {
    decode(std::str::from_utf8(bytes)?)
}

/// Decode a single non-blank line
///
/// `line_number` is 1-based and only used for error reporting.
pub fn decode_line(line: &str, line_number: usize) -> Result<Record> {
    let mut id: Option<&str> = None;
    let mut email: Option<&str> = None;
    let mut name: Option<&str> = None;

    for pair in line.split(PAIR_SEPARATOR) {
        // Pairs without '=' carry nothing
        let Some((key, value)) = pair.split_once(KEY_VALUE_SEPARATOR) else {
            continue;
        };

        // Last write wins for repeated keys
        match key.trim() {
            ID_KEY => id = Some(value.trim()),
            EMAIL_KEY => email = Some(value.trim()),
            NAME_KEY => name = Some(value.trim()),
            _ => {}
        }
    }

    let format_error = |reason: String| StoreError::Format {
        line: line_number,
        content: line.to_string(),
        reason,
    };

    let id = id.ok_or_else(|| format_error("missing 'id'".to_string()))?;
    let id: RecordId = id
        .parse()
        .map_err(|_| format_error(format!("'id' is not an integer: {:?}", id)))?;
    let email = email.ok_or_else(|| format_error("missing 'email'".to_string()))?;
    let name = name.ok_or_else(|| format_error("missing 'name'".to_string()))?;

    Ok(Record::new(id, email, name))
}
