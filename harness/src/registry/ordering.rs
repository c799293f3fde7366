//! Startup ordering graph
//!
//! Consumers register the resources they require at wiring time; `verify`
//! rejects the graph when any consumer whose capabilities require a resource
//! is missing the corresponding edge. This replaces runtime reflection over
//! a bean container with an explicit registration table checked before
//! anything initializes.

use std::collections::{HashMap, HashSet};

use shared::ResourceName;

use crate::error::{HarnessError, HarnessResult};

/// A downstream component that requires resources to be Running first
#[derive(Clone, Debug)]
pub struct ConsumerDeclaration {
    pub name: String,
    /// Capability tags, e.g. "bolt-client"; the graph maps each capability
    /// to the resource that provides it.
    pub capabilities: Vec<String>,
    pub depends_on: HashSet<ResourceName>,
}

impl ConsumerDeclaration {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capabilities: Vec::new(),
            depends_on: HashSet::new(),
        }
    }

    pub fn capability<S: Into<String>>(mut self, capability: S) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn depends_on(mut self, resource: &ResourceName) -> Self {
        self.depends_on.insert(resource.clone());
        self
    }
}

/// Wiring-time registration table of resources, capability requirements
/// and consumers
#[derive(Default)]
pub struct StartupGraph {
    resources: Vec<ResourceName>,
    requirements: HashMap<String, ResourceName>,
    consumers: Vec<ConsumerDeclaration>,
}

impl StartupGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource; duplicate names are rejected outright
    pub fn add_resource(&mut self, name: &ResourceName) -> HarnessResult<()> {
        if self.resources.contains(name) {
            return Err(HarnessError::DuplicateResource { name: name.clone() });
        }
        self.resources.push(name.clone());
        Ok(())
    }

    /// Record that every consumer carrying `capability` must depend on `resource`
    pub fn require_capability(
        &mut self,
        capability: &str,
        resource: &ResourceName,
    ) -> HarnessResult<()> {
        if !self.resources.contains(resource) {
            return Err(HarnessError::Configuration {
                field: format!("requirement '{capability}' references unknown resource '{resource}'"),
            });
        }
        self.requirements
            .insert(capability.to_string(), resource.clone());
        Ok(())
    }

    /// Register a consumer declaration
    pub fn register_consumer(&mut self, consumer: ConsumerDeclaration) -> HarnessResult<()> {
        if self.consumers.iter().any(|c| c.name == consumer.name) {
            return Err(HarnessError::Configuration {
                field: format!("consumer '{}' registered twice", consumer.name),
            });
        }
        for dependency in &consumer.depends_on {
            if !self.resources.contains(dependency) {
                return Err(HarnessError::Configuration {
                    field: format!(
                        "consumer '{}' depends on unknown resource '{dependency}'",
                        consumer.name
                    ),
                });
            }
        }
        self.consumers.push(consumer);
        Ok(())
    }

    /// Add a dependency edge to an already-registered consumer
    pub fn register_dependency(
        &mut self,
        consumer_name: &str,
        resource: &ResourceName,
    ) -> HarnessResult<()> {
        if !self.resources.contains(resource) {
            return Err(HarnessError::Configuration {
                field: format!("dependency references unknown resource '{resource}'"),
            });
        }

        let consumer = self
            .consumers
            .iter_mut()
            .find(|c| c.name == consumer_name)
            .ok_or_else(|| HarnessError::Configuration {
                field: format!("unknown consumer '{consumer_name}'"),
            })?;

        consumer.depends_on.insert(resource.clone());
        Ok(())
    }

    /// Check the universal dependency property: every consumer whose
    /// capabilities require a resource must carry the edge to it
    pub fn verify(&self) -> HarnessResult<()> {
        for consumer in &self.consumers {
            for capability in &consumer.capabilities {
                if let Some(required) = self.requirements.get(capability) {
                    if !consumer.depends_on.contains(required) {
                        return Err(HarnessError::OrderingViolation {
                            consumer: consumer.name.clone(),
                            resource: required.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Initialization order: resources strictly before every consumer
    ///
    /// Verifies the graph first; a graph that fails `verify` has no valid
    /// initialization order.
    pub fn initialization_order(&self) -> HarnessResult<Vec<String>> {
        self.verify()?;

        let mut order: Vec<String> = self
            .resources
            .iter()
            .map(|name| name.to_string())
            .collect();
        order.extend(self.consumers.iter().map(|c| c.name.clone()));
        Ok(order)
    }

    /// All consumers declaring a dependency on `resource`
    pub fn consumers_of(&self, resource: &ResourceName) -> Vec<&ConsumerDeclaration> {
        self.consumers
            .iter()
            .filter(|c| c.depends_on.contains(resource))
            .collect()
    }
}
