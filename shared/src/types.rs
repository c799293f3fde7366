//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Unique identifier for a managed resource, e.g. "graph-db"
///
/// Names are restricted to lowercase alphanumerics and `-` so they can be
/// embedded verbatim in property keys like `embedded.<name>.install.enabled`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: &str) -> SharedResult<Self> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(SharedError::InvalidResourceName {
                name: name.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named port exposed by a resource, e.g. `bolt` or `https`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    pub name: String,
    pub port: u16,
}

/// Network endpoint of a running resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub ports: Vec<PortBinding>,
}

impl Endpoint {
    pub fn new(host: &str, ports: Vec<PortBinding>) -> Self {
        Self {
            host: host.to_string(),
            ports,
        }
    }

    /// Look up a port by its binding name
    pub fn port(&self, port_name: &str) -> SharedResult<u16> {
        self.ports
            .iter()
            .find(|binding| binding.name == port_name)
            .map(|binding| binding.port)
            .ok_or_else(|| SharedError::UnknownPort {
                port_name: port_name.to_string(),
            })
    }

    /// Address string for the given binding, e.g. "127.0.0.1:7687"
    pub fn address(&self, port_name: &str) -> SharedResult<String> {
        Ok(format!("{}:{}", self.host, self.port(port_name)?))
    }
}

/// Credentials published for a running resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}

/// Lifecycle state of a managed resource
///
/// NotStarted -> Starting -> Running -> Stopped; any state may fall into
/// Failed on an unrecoverable startup error. Stopped and Failed are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    NotStarted,
    Starting,
    Running,
    Stopped,
    Failed,
}

impl ResourceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResourceState::Stopped | ResourceState::Failed)
    }

    /// Whether the state machine permits moving to `next` from here
    pub fn can_transition_to(&self, next: ResourceState) -> bool {
        if next == ResourceState::Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (ResourceState::NotStarted, ResourceState::Starting)
                | (ResourceState::Starting, ResourceState::Running)
                | (ResourceState::Running, ResourceState::Stopped)
        )
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceState::NotStarted => "not-started",
            ResourceState::Starting => "starting",
            ResourceState::Running => "running",
            ResourceState::Stopped => "stopped",
            ResourceState::Failed => "failed",
        };
        write!(f, "{label}")
    }
}
