//! Snapshot encoding
//!
//! Writes records in canonical `id,email,name` order.

use std::fmt::Write;

use crate::record::Record;

/// Encode a record list to snapshot text
///
/// One `\n`-terminated line per record, no header.
pub fn encode(records: &[Record]) -> String {
    let mut text = String::with_capacity(records.len() * 48);
    for record in records {
        write_record(&mut text, record);
    }
    text
}

/// Encode a single record, including its trailing newline
pub fn encode_record(record: &Record) -> String {
    let mut line = String::new();
    write_record(&mut line, record);
    line
}

fn write_record(out: &mut String, record: &Record) {
    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "id={},email={},name={}",
        record.id(),
        record.email,
        record.name
    );
}
