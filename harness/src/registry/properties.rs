//! Process-wide configuration property namespace
//!
//! Once a resource reaches Running its connection details are published here
//! under the keys downstream configuration expects:
//! `embedded.<name>.install.enabled`, `<name>.host`, `<name>.<port>Port`,
//! `<name>.user` and `<name>.password`. Entries are immutable between
//! publication and the resource being stopped, so concurrent reads are safe.

use std::collections::HashMap;
use std::sync::RwLock;

use shared::ResourceName;

use crate::error::{HarnessError, HarnessResult};
use crate::registry::ManagedResource;

#[derive(Default)]
pub struct PropertyStore {
    entries: RwLock<HashMap<String, String>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the discoverable entries for a running resource
    pub fn publish_resource(&self, resource: &ManagedResource) {
        let name = resource.name.as_str();
        let mut entries = self.entries.write().expect("property store lock poisoned");

        entries.insert(format!("embedded.{name}.install.enabled"), "true".to_string());
        entries.insert(format!("{name}.host"), resource.endpoint.host.clone());
        for binding in &resource.endpoint.ports {
            entries.insert(
                format!("{}.{}Port", name, binding.name),
                binding.port.to_string(),
            );
        }
        entries.insert(format!("{name}.user"), resource.credentials.user.clone());
        entries.insert(
            format!("{name}.password"),
            resource.credentials.password.clone(),
        );

        tracing::debug!("📋 Published {} properties for '{}'", 4 + resource.endpoint.ports.len(), name);
    }

    /// Remove all entries belonging to a resource
    pub fn remove_resource(&self, name: &ResourceName) {
        let prefix = format!("{}.", name.as_str());
        let embedded_prefix = format!("embedded.{}.", name.as_str());

        let mut entries = self.entries.write().expect("property store lock poisoned");
        entries.retain(|key, _| !key.starts_with(&prefix) && !key.starts_with(&embedded_prefix));
    }

    /// Look up a property, surfacing absence instead of defaulting
    pub fn get(&self, key: &str) -> HarnessResult<String> {
        let entries = self.entries.read().expect("property store lock poisoned");
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| HarnessError::ConfigurationMissing {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().expect("property store lock poisoned");
        entries.contains_key(key)
    }

    /// Snapshot of all current entries
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .expect("property store lock poisoned")
            .clone()
    }
}
