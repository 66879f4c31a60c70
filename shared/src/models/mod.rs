//! Entity models and wire payloads
//!
//! Stored records, their external projections, and the request payloads the
//! simulated API accepts. The wire format is camelCase JSON, matching the
//! frontend consumer.

mod account;
mod department;
mod employee;
mod workflow;

pub use account::*;
pub use department::*;
pub use employee::*;
pub use workflow::*;
