//! Shared types for the embedded test-resource harness
//!
//! Contains only truly cross-crate types: resource identity, endpoints,
//! credentials and lifecycle state. Harness-internal types (launch handles,
//! fault sessions) are kept in the harness crate.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
