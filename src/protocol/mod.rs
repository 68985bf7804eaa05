//! Protocol Module
//!
//! Request and response shapes an ingress adapter (HTTP handler, CLI, ...)
//! exchanges with the engine.
//!
//! ## Commands
//! - UPLOAD   - decode uploaded content and store/refresh the snapshot
//! - CREATE   - insert a new record (id must be unused)
//! - UPDATE   - overwrite email and name of an existing record
//! - PATCH    - overwrite only the supplied non-empty fields
//! - DELETE   - remove a record
//! - DESCRIBE - snapshot identity, record count and timestamps
//!
//! ### Response Bodies (JSON)
//! ```text
//! OK:           { "message": ..., "recordId": ..., "operation": "CREATE", ... }
//! CLIENT_ERROR: { "error": <error message> }
//! ```

mod command;
mod response;

pub use command::{Command, Operation};
pub use response::{Response, Status};
