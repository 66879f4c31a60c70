//! Simulated response shape
//!
//! Every simulated answer is either a success carrying an optional JSON body
//! or a failure carrying a structured `{ message }` payload:
//!
//! ```json
//! { "status": 200, "body": { ... } }
//! { "status": 400, "error": { "message": "Invalid department ID" } }
//! { "status": 401, "error": { "message": "Unauthorized" } }
//! ```

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Response produced by the simulated backend
#[derive(Debug, Clone)]
pub struct SimResponse {
    pub status: StatusCode,
    /// Success payload (`None` for empty 200s)
    pub body: Option<Value>,
    /// Failure payload
    pub error: Option<ErrorBody>,
}

impl SimResponse {
    pub fn ok(body: Option<Value>) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            error: None,
        }
    }

    pub fn err(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            error: Some(ErrorBody {
                message: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the success body into a typed value
    pub fn body_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.body
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Error message, if this is a failure response
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
