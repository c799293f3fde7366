//! Harness-specific error types

use shared::{ResourceName, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Resource '{name}' failed to start: {reason}")]
    ResourceStartup { name: ResourceName, reason: String },

    #[error("Resource '{name}' is already registered")]
    DuplicateResource { name: ResourceName },

    #[error("Configuration property not available: {key}")]
    ConfigurationMissing { key: String },

    #[error("Fault injection failed for '{resource}': {reason}")]
    FaultInjection {
        resource: ResourceName,
        reason: String,
    },

    #[error("A fault session is already active for '{resource}'")]
    FaultSessionActive { resource: ResourceName },

    #[error("Consumer '{consumer}' is missing a startup dependency on '{resource}'")]
    OrderingViolation { consumer: String, resource: ResourceName },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Shared component error")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
