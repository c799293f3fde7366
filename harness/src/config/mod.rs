//! Configuration Management
//!
//! Explicit configuration structs and builders for declaring embedded
//! resources. No scanning, no implicit discovery: everything a resource
//! needs is passed into the manager as data.

pub mod builder;
pub mod resource;

// Re-export main types
pub use builder::ResourceConfigBuilder;
pub use resource::{PortRequest, ResourceConfig};
