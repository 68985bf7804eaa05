//! Response definitions
//!
//! Maps engine results to status + JSON body pairs for callers.

use serde_json::{json, Map, Value};

use crate::engine::Outcome;
use crate::error::{Result, StoreError};

use super::Command;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    ClientError,
}

impl Status {
    /// Equivalent HTTP status code
    pub fn http_code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::ClientError => 400,
        }
    }
}

/// A response to send to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// JSON body
    pub body: Value,
}

impl Response {
    /// Create an OK response
    pub fn ok(body: Value) -> Self {
        Self {
            status: Status::Ok,
            body,
        }
    }

    /// Create an error response carrying the error's message
    ///
    /// Every engine error maps to a client error.
    pub fn error(error: &StoreError) -> Self {
        Self {
            status: Status::ClientError,
            body: json!({ "error": error.to_string() }),
        }
    }

    /// Build the response for a command and its result
    pub fn from_result(command: &Command, result: &Result<Outcome>) -> Self {
        match result {
            Ok(outcome) => Self::ok(success_body(command, outcome)),
            Err(e) => Self::error(e),
        }
    }

    /// Check if the response is OK
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Serialize the body as pretty-printed JSON
    pub fn to_json(&self) -> String {
        format!("{:#}", self.body)
    }
}

fn success_body(command: &Command, outcome: &Outcome) -> Value {
    match (command, outcome) {
        (_, Outcome::Uploaded(upload)) => json!({
            "message": "Records retrieved successfully",
            "snapshot": upload.snapshot,
            "created": upload.created,
            "count": upload.records.len(),
            "records": upload.records,
        }),
        (_, Outcome::Described(info)) => json!(info),
        (Command::Create { email, name, .. }, Outcome::Confirmed(c)) => json!({
            "message": c.message,
            "recordId": c.record_id,
            "recordEmail": email,
            "recordName": name,
            "operation": c.operation,
        }),
        (Command::Update { email, name, .. }, Outcome::Confirmed(c)) => json!({
            "message": c.message,
            "recordId": c.record_id,
            "updatedEmail": email,
            "updatedName": name,
            "operation": c.operation,
        }),
        (Command::Patch { email, name, .. }, Outcome::Confirmed(c)) => {
            let mut body = Map::new();
            body.insert("message".to_string(), json!(c.message));
            body.insert("recordId".to_string(), json!(c.record_id));
            body.insert("operation".to_string(), json!(c.operation));
            // Only echo fields that were actually applied
            if let Some(email) = email.as_deref().filter(|s| !s.is_empty()) {
                body.insert("updatedEmail".to_string(), json!(email));
            }
            if let Some(name) = name.as_deref().filter(|s| !s.is_empty()) {
                body.insert("updatedName".to_string(), json!(name));
            }
            Value::Object(body)
        }
        (Command::Delete { .. }, Outcome::Confirmed(c)) => json!({
            "message": c.message,
            "deletedRecordId": c.record_id,
            "operation": c.operation,
        }),
        (_, Outcome::Confirmed(c)) => json!({
            "message": c.message,
            "recordId": c.record_id,
            "operation": c.operation,
        }),
    }
}
