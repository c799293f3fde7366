//! Process-wide resource registry
//!
//! Owns every `ManagedResource` for the duration of a test run. Built once
//! at run start, passed by reference to anything needing resource lookups,
//! torn down at run end. Duplicate names are rejected at registration.

pub mod ordering;
pub mod properties;

pub use ordering::{ConsumerDeclaration, StartupGraph};
pub use properties::PropertyStore;

use std::collections::HashMap;
use std::sync::Mutex;

use shared::{Credentials, Endpoint, ResourceName, ResourceState};

use crate::error::{HarnessError, HarnessResult};
use crate::traits::LaunchedResource;

/// A registered embedded resource and its published connection descriptor
#[derive(Clone, Debug)]
pub struct ManagedResource {
    pub name: ResourceName,
    pub endpoint: Endpoint,
    pub credentials: Credentials,
    pub state: ResourceState,
}

/// Registry entry pairing the descriptor with the underlying process handle
struct ResourceEntry {
    resource: ManagedResource,
    launched: Option<LaunchedResource>,
}

#[derive(Default)]
pub struct ResourceRegistry {
    entries: Mutex<HashMap<ResourceName, ResourceEntry>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; the name must not already be taken
    pub fn insert(
        &self,
        resource: ManagedResource,
        launched: Option<LaunchedResource>,
    ) -> HarnessResult<()> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        if entries.contains_key(&resource.name) {
            return Err(HarnessError::DuplicateResource {
                name: resource.name.clone(),
            });
        }
        entries.insert(resource.name.clone(), ResourceEntry { resource, launched });
        Ok(())
    }

    pub fn contains(&self, name: &ResourceName) -> bool {
        let entries = self.entries.lock().expect("registry lock poisoned");
        entries.contains_key(name)
    }

    /// Snapshot of a resource's descriptor
    pub fn get(&self, name: &ResourceName) -> Option<ManagedResource> {
        let entries = self.entries.lock().expect("registry lock poisoned");
        entries.get(name).map(|entry| entry.resource.clone())
    }

    pub fn state(&self, name: &ResourceName) -> Option<ResourceState> {
        let entries = self.entries.lock().expect("registry lock poisoned");
        entries.get(name).map(|entry| entry.resource.state)
    }

    /// Transition a resource, enforcing state-machine legality
    pub fn transition(&self, name: &ResourceName, next: ResourceState) -> HarnessResult<()> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| HarnessError::Configuration {
                field: format!("unknown resource '{name}'"),
            })?;

        if !entry.resource.state.can_transition_to(next) {
            return Err(HarnessError::Configuration {
                field: format!(
                    "illegal state transition for '{name}': {} -> {next}",
                    entry.resource.state
                ),
            });
        }
        entry.resource.state = next;
        Ok(())
    }

    /// Attach (or restore) the process handle of a registered resource
    pub fn attach_launched(
        &self,
        name: &ResourceName,
        launched: LaunchedResource,
    ) -> HarnessResult<()> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| HarnessError::Configuration {
                field: format!("unknown resource '{name}'"),
            })?;
        entry.launched = Some(launched);
        Ok(())
    }

    /// Take the process handle out of an entry, leaving the descriptor behind
    pub fn take_launched(&self, name: &ResourceName) -> Option<LaunchedResource> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        entries.get_mut(name).and_then(|entry| entry.launched.take())
    }

    /// Names of all registered resources
    pub fn names(&self) -> Vec<ResourceName> {
        let entries = self.entries.lock().expect("registry lock poisoned");
        entries.keys().cloned().collect()
    }

    /// Force-kill any remaining child processes; emergency teardown only
    pub fn kill_remaining(&self) {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        for entry in entries.values_mut() {
            if let Some(launched) = entry.launched.as_mut() {
                if let Some(child) = launched.child.as_mut() {
                    tracing::warn!(
                        "🚨 Emergency cleanup: force killing '{}'",
                        entry.resource.name
                    );
                    let _ = child.start_kill();
                }
            }
        }
    }
}
