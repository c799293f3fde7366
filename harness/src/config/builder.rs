//! Resource Configuration Builder
//!
//! Provides a flexible builder pattern for constructing resource configurations

use std::path::PathBuf;
use std::time::Duration;

use shared::{Credentials, ResourceName};

use super::resource::{PortRequest, ResourceConfig};
use crate::error::HarnessResult;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_USER: &str = "neo4j";
const DEFAULT_PASSWORD: &str = "letmein";
const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ResourceConfigBuilder {
    name: String,
    enabled: bool,
    program: Option<String>,
    args: Vec<String>,
    host: String,
    ports: Vec<PortRequest>,
    ready_port: Option<String>,
    credentials: Credentials,
    install_dir: Option<PathBuf>,
    startup_timeout: Duration,
}

impl ResourceConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            program: None,
            args: Vec::new(),
            host: DEFAULT_HOST.to_string(),
            ports: Vec::new(),
            ready_port: None,
            credentials: Credentials::new(DEFAULT_USER, DEFAULT_PASSWORD),
            install_dir: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }

    /// Enable or disable the resource (disabled resources never start)
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the program to launch
    pub fn program<S: Into<String>>(mut self, program: S) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Append a program argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the host the resource binds to
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Declare a named port; `None` requests auto-assignment
    pub fn port<S: Into<String>>(mut self, name: S, port: Option<u16>) -> Self {
        self.ports.push(PortRequest {
            name: name.into(),
            port,
        });
        self
    }

    /// Select which port binding the readiness probe targets
    pub fn ready_port<S: Into<String>>(mut self, name: S) -> Self {
        self.ready_port = Some(name.into());
        self
    }

    /// Set the credentials published for the resource
    pub fn credentials(mut self, user: &str, password: &str) -> Self {
        self.credentials = Credentials::new(user, password);
        self
    }

    /// Set the directory the resource materializes into
    pub fn install_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.install_dir = Some(dir.into());
        self
    }

    /// Set the maximum time to wait for the resource to report ready
    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Build the configuration, validating the resource name
    pub fn build(self) -> HarnessResult<ResourceConfig> {
        let name = ResourceName::new(&self.name)?;

        Ok(ResourceConfig {
            name,
            enabled: self.enabled,
            program: self.program,
            args: self.args,
            host: self.host,
            ports: self.ports,
            ready_port: self.ready_port,
            credentials: self.credentials,
            install_dir: self.install_dir,
            startup_timeout: self.startup_timeout,
        })
    }
}
