//! Trait definitions with mockall annotations for testing
//!
//! These traits are the seams between the harness and its external
//! collaborators: the facility that actually launches the resource process,
//! and the network-shaping facility that degrades its endpoint. Mock
//! implementations are generated for use in tests.

use std::time::Duration;

use shared::{Endpoint, ResourceName};

use crate::config::ResourceConfig;
use crate::error::HarnessResult;

/// Handle for a launched resource process
///
/// `child` is `None` when the resource is hosted outside the harness
/// process (e.g. a container managed elsewhere, or a test double).
#[derive(Debug)]
pub struct LaunchedResource {
    pub endpoint: Endpoint,
    pub child: Option<tokio::process::Child>,
}

impl LaunchedResource {
    /// Handle for a resource the harness does not own a child process for
    pub fn detached(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            child: None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }
}

/// Resource launching abstraction
///
/// The harness resolves the endpoint (host, port assignments) before calling
/// `launch`; the launcher is responsible only for materializing a process
/// that serves that endpoint and for tearing it down again.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ResourceLauncher: Send + Sync {
    /// Launch the external resource described by `config` at `endpoint`
    async fn launch(
        &self,
        config: &ResourceConfig,
        endpoint: &Endpoint,
    ) -> HarnessResult<LaunchedResource>;

    /// Terminate a previously launched resource, releasing its process
    async fn terminate(
        &self,
        name: &ResourceName,
        launched: &mut LaunchedResource,
    ) -> HarnessResult<()>;
}

/// Network shaping abstraction for fault injection
///
/// The contract is strictly "apply additional latency to everything reaching
/// this endpoint" and "remove it again"; how that is achieved (tc/netem,
/// a proxy, a test double) is up to the implementation.
#[mockall::automock]
#[async_trait::async_trait]
pub trait NetworkShaper: Send + Sync {
    async fn apply_latency(&self, endpoint: &Endpoint, latency: Duration) -> HarnessResult<()>;

    async fn clear_latency(&self, endpoint: &Endpoint) -> HarnessResult<()>;
}
