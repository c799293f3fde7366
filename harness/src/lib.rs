//! Embedded Test-Resource Harness
//!
//! Manages external service instances (databases, brokers) started solely
//! for the duration of a test run: dependency-ordered startup, a read-only
//! configuration property namespace, scoped network fault injection and
//! idempotent teardown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use harness::*;
//!
//! # async fn example() -> error::HarnessResult<()> {
//! // Describe the embedded resource
//! let config = ResourceConfig::builder("graph-db")
//!     .program("neo4j-server")
//!     .port("bolt", Some(7687))
//!     .port("https", None)
//!     .build()?;
//!
//! // Start it and wait until it is running
//! let manager = ResourceManager::new(Arc::new(ProcessLauncher::new()));
//! let resource = manager.start(config).await?.expect("resource enabled");
//!
//! // Connection details are now discoverable
//! let bolt_port = manager.properties().get("graph-db.boltPort")?;
//!
//! // Run an operation under injected latency; the fault is always reverted
//! let injector = FaultInjector::new(Arc::new(TcNetworkShaper::new()));
//! injector
//!     .with_network_latency(&resource, Duration::from_millis(1000), || async {
//!         // query the resource here
//!         Ok(())
//!     })
//!     .await?;
//!
//! manager.stop_all().await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod traits;

// Main interfaces - re-exported at crate root for convenience
pub use config::{PortRequest, ResourceConfig, ResourceConfigBuilder};
pub use error::{HarnessError, HarnessResult};
pub use registry::{ConsumerDeclaration, ManagedResource, PropertyStore, ResourceRegistry, StartupGraph};
pub use runtime::{FaultInjector, InjectionEvent, ProcessLauncher, ResourceManager, TcNetworkShaper};

// Supporting types
pub use traits::{LaunchedResource, NetworkShaper, ResourceLauncher};
