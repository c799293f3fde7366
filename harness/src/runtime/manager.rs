//! Resource lifecycle management
//!
//! `ResourceManager` starts external resources before anything that depends
//! on them, publishes their connection descriptors into the property store,
//! and tears everything down at suite completion. One manager per test run.

use std::sync::{Arc, Mutex};

use shared::{Endpoint, PortBinding, ResourceName, ResourceState};

use crate::config::ResourceConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::registry::{ManagedResource, PropertyStore, ResourceRegistry};
use crate::runtime::readiness;
use crate::traits::ResourceLauncher;

const DEFAULT_BASE_PORT: u16 = 9000;

pub struct ResourceManager {
    launcher: Arc<dyn ResourceLauncher>,
    registry: ResourceRegistry,
    properties: Arc<PropertyStore>,
    /// Base counter for auto-assigned ports
    next_port: Mutex<u16>,
}

impl ResourceManager {
    pub fn new(launcher: Arc<dyn ResourceLauncher>) -> Self {
        Self {
            launcher,
            registry: ResourceRegistry::new(),
            properties: Arc::new(PropertyStore::new()),
            next_port: Mutex::new(DEFAULT_BASE_PORT),
        }
    }

    /// Configure base port for auto-assignment (fluent API)
    pub fn with_base_port(self, base_port: u16) -> Self {
        *self.next_port.lock().expect("port counter lock poisoned") = base_port;
        self
    }

    /// The read-only configuration namespace fed by started resources
    pub fn properties(&self) -> Arc<PropertyStore> {
        Arc::clone(&self.properties)
    }

    pub fn state(&self, name: &ResourceName) -> Option<ResourceState> {
        self.registry.state(name)
    }

    pub fn resource(&self, name: &ResourceName) -> Option<ManagedResource> {
        self.registry.get(name)
    }

    /// Start one embedded resource and block until it is Running
    ///
    /// Returns `None` without registering anything when the resource is
    /// disabled; downstream components must tolerate absence. A startup
    /// failure is fatal: the resource lands in Failed and the error names it.
    pub async fn start(&self, config: ResourceConfig) -> HarnessResult<Option<ManagedResource>> {
        if !config.enabled {
            tracing::info!("⏭️ Resource '{}' is disabled, skipping start", config.name);
            return Ok(None);
        }

        if !config.is_valid() {
            return Err(HarnessError::Configuration {
                field: format!("invalid configuration for resource '{}'", config.name),
            });
        }

        let endpoint = self.resolve_endpoint(&config)?;

        // Reserve the name before launching anything: a concurrent start for
        // the same name loses here, not in a race over the property namespace.
        let starting = ManagedResource {
            name: config.name.clone(),
            endpoint: endpoint.clone(),
            credentials: config.credentials.clone(),
            state: ResourceState::Starting,
        };
        self.registry.insert(starting, None)?;

        if let Some(dir) = &config.install_dir {
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                let _ = self.registry.transition(&config.name, ResourceState::Failed);
                return Err(e.into());
            }
        }

        tracing::info!("🚀 Starting resource '{}' at {}", config.name, endpoint.host);

        let mut launched = match self.launcher.launch(&config, &endpoint).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = self.registry.transition(&config.name, ResourceState::Failed);
                return Err(e);
            }
        };

        // is_valid guarantees the probe binding exists among the declared ports
        let probe_port = config.ready_port_name().unwrap_or_default().to_string();
        let probe_address = match endpoint.address(&probe_port) {
            Ok(address) => address,
            Err(e) => {
                let _ = self.launcher.terminate(&config.name, &mut launched).await;
                let _ = self.registry.transition(&config.name, ResourceState::Failed);
                return Err(e.into());
            }
        };

        if let Err(e) =
            readiness::wait_until_ready(&config.name, &probe_address, config.startup_timeout).await
        {
            tracing::error!("❌ Resource '{}' failed to become ready", config.name);
            let _ = self.launcher.terminate(&config.name, &mut launched).await;
            let _ = self.registry.transition(&config.name, ResourceState::Failed);
            return Err(e);
        }

        self.registry.transition(&config.name, ResourceState::Running)?;
        self.registry.attach_launched(&config.name, launched)?;

        let resource = ManagedResource {
            name: config.name.clone(),
            endpoint,
            credentials: config.credentials.clone(),
            state: ResourceState::Running,
        };

        // Properties become discoverable only once the resource is Running
        self.properties.publish_resource(&resource);

        tracing::info!("✅ Resource '{}' is running", config.name);
        Ok(Some(resource))
    }

    /// Stop a resource, releasing its process and configuration entries
    ///
    /// Idempotent: stopping an unknown or already-Stopped resource is a no-op.
    pub async fn stop(&self, name: &ResourceName) -> HarnessResult<()> {
        match self.registry.state(name) {
            None => {
                tracing::debug!("⏭️ Resource '{}' not registered, nothing to stop", name);
                return Ok(());
            }
            Some(state) if state.is_terminal() => {
                tracing::debug!("⏭️ Resource '{}' already {}, nothing to stop", name, state);
                return Ok(());
            }
            Some(_) => {}
        }

        if let Some(mut launched) = self.registry.take_launched(name) {
            if let Err(e) = self.launcher.terminate(name, &mut launched).await {
                // Restore the handle so a retried stop can still reach the process
                let _ = self.registry.attach_launched(name, launched);
                return Err(e);
            }
        }

        self.properties.remove_resource(name);
        self.registry.transition(name, ResourceState::Stopped)?;

        tracing::info!("🛑 Resource '{}' stopped", name);
        Ok(())
    }

    /// Stop every registered resource; suite teardown entry point
    pub async fn stop_all(&self) -> HarnessResult<()> {
        for name in self.registry.names() {
            self.stop(&name).await?;
        }
        tracing::info!("✅ All resources stopped");
        Ok(())
    }

    /// Resolve explicit and auto-assigned ports into a concrete endpoint
    fn resolve_endpoint(&self, config: &ResourceConfig) -> HarnessResult<Endpoint> {
        let mut next_port = self.next_port.lock().expect("port counter lock poisoned");
        let mut ports = Vec::with_capacity(config.ports.len());
        for request in &config.ports {
            let port = match request.port {
                Some(port) => port,
                None => {
                    let assigned = *next_port;
                    *next_port =
                        assigned
                            .checked_add(1)
                            .ok_or_else(|| HarnessError::Configuration {
                                field: format!("port auto-assignment exhausted at {assigned}"),
                            })?;
                    assigned
                }
            };
            ports.push(PortBinding {
                name: request.name.clone(),
                port,
            });
        }

        Ok(Endpoint::new(&config.host, ports))
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        // Emergency cleanup - force kill any remaining processes
        self.registry.kill_remaining();
    }
}
