//! Simulated API handlers
//!
//! One module per collection. Handlers follow a single pattern:
//! authorize → validate → mutate in memory → flush the collection →
//! project the affected record. Flushing happens inside the store lock,
//! before the response envelope starts its delay.

pub mod accounts;
pub mod departments;
pub mod employees;
pub mod workflows;

use serde::de::DeserializeOwned;

use crate::core::ApiError;
use crate::routes::RequestContext;

/// Deserialize the request body into a typed payload
pub(crate) fn parse_body<T: DeserializeOwned>(ctx: &RequestContext) -> Result<T, ApiError> {
    serde_json::from_value(ctx.body.clone())
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
}
