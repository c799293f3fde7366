//! Shared error types for the test-resource harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid resource name: {name}")]
    InvalidResourceName { name: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Unknown port binding: {port_name}")]
    UnknownPort { port_name: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
