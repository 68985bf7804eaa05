//! Record Codec Module
//!
//! Converts between the textual snapshot format and ordered record lists.
//!
//! ## Responsibilities
//! - Decode uploaded snapshot text line by line
//! - Encode record lists back to canonical text
//! - Report the first malformed line with its line number
//!
//! ## Text Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ id=1,email=a@x.com,name=A\n                  │
//! │ \n                              (skipped)    │
//! │ name=B,id=2,email=b@x.com\n     (any order)  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Decoding accepts pairs in any order; encoding always writes
//! `id,email,name`. Cross-line id uniqueness is not checked here.

mod reader;
mod writer;

pub use reader::{decode, decode_bytes, decode_line};
pub use writer::{encode, encode_record};

/// Separator between `key=value` pairs
pub const PAIR_SEPARATOR: char = ',';

/// Separator between a key and its value
pub const KEY_VALUE_SEPARATOR: char = '=';

pub const ID_KEY: &str = "id";
pub const EMAIL_KEY: &str = "email";
pub const NAME_KEY: &str = "name";
