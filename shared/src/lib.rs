//! Shared types for the simulated HR backend
//!
//! Wire-level types shared between the simulated backend and its
//! consumers: entity models, projections, the request/response
//! envelope, and timestamp helpers.

pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use request::SimRequest;
pub use response::{ErrorBody, SimResponse};
