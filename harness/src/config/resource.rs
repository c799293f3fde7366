//! Embedded resource configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::{Credentials, ResourceName};

/// A port the resource should expose, optionally pinned to a fixed number
///
/// Ports without an explicit number are auto-assigned by the manager from
/// its base-port counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRequest {
    pub name: String,
    pub port: Option<u16>,
}

/// Declarative description of one embedded resource
///
/// Mirrors the `embedded.<name>.install.*` configuration surface: `enabled`
/// decides whether the resource is started at all, `install_dir` is where
/// the resource materializes its data, and `ports` drive the published
/// `<name>.<port>Port` properties.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: ResourceName,
    pub enabled: bool,
    /// Program to launch, with its arguments. Required when enabled.
    pub program: Option<String>,
    pub args: Vec<String>,
    pub host: String,
    pub ports: Vec<PortRequest>,
    /// Port binding probed for readiness; defaults to the first binding.
    pub ready_port: Option<String>,
    pub credentials: Credentials,
    pub install_dir: Option<PathBuf>,
    pub startup_timeout: Duration,
}

impl ResourceConfig {
    /// Create a builder for the named resource
    pub fn builder(name: &str) -> super::ResourceConfigBuilder {
        super::ResourceConfigBuilder::new(name)
    }

    /// Check whether this configuration can actually be started
    pub fn is_valid(&self) -> bool {
        if !self.enabled {
            // Disabled resources are never launched, nothing else to check
            return true;
        }

        let ready_port_declared = match &self.ready_port {
            Some(name) => self.ports.iter().any(|request| &request.name == name),
            None => true,
        };

        self.program.is_some()
            && !self.ports.is_empty()
            && !self.host.is_empty()
            && ready_port_declared
    }

    /// Name of the port binding used for the readiness probe
    pub fn ready_port_name(&self) -> Option<&str> {
        self.ready_port
            .as_deref()
            .or_else(|| self.ports.first().map(|request| request.name.as_str()))
    }
}
