//! Fault Injection
//!
//! Scoped network fault sessions against a managed resource's endpoint.
//! A session applies additional latency, runs the caller's operation, and
//! unconditionally reverts the fault before returning, so later operations
//! observe unmodified network behavior. At most one session may be active
//! per resource; nesting is an error, not a queue.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::{Endpoint, ResourceName, ResourceState};
use uuid::Uuid;

use crate::error::{HarnessError, HarnessResult};
use crate::registry::ManagedResource;
use crate::traits::NetworkShaper;

/// Record of one fault application or reversion, kept for post-test analysis
#[derive(Debug, Clone)]
pub struct InjectionEvent {
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub fault_type: String,
    pub target: String,
    pub success: bool,
    pub details: String,
}

pub struct FaultInjector {
    shaper: Arc<dyn NetworkShaper>,
    active_sessions: Mutex<HashSet<ResourceName>>,
    injection_log: Mutex<Vec<InjectionEvent>>,
}

impl FaultInjector {
    pub fn new(shaper: Arc<dyn NetworkShaper>) -> Self {
        Self {
            shaper,
            active_sessions: Mutex::new(HashSet::new()),
            injection_log: Mutex::new(Vec::new()),
        }
    }

    /// Run `op` with `latency` injected on all traffic reaching `resource`
    ///
    /// The fault is reverted on every exit path; an error from `op` is
    /// propagated only after reversion has been attempted. A failed
    /// reversion after a successful operation is surfaced as a
    /// `FaultInjection` error.
    pub async fn with_network_latency<F, Fut, T>(
        &self,
        resource: &ManagedResource,
        latency: Duration,
        op: F,
    ) -> HarnessResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HarnessResult<T>>,
    {
        if resource.state != ResourceState::Running {
            return Err(HarnessError::FaultInjection {
                resource: resource.name.clone(),
                reason: format!("resource is {}, not running", resource.state),
            });
        }

        self.begin_session(&resource.name)?;
        let session_id = Uuid::new_v4();

        tracing::info!(
            "💉 Injecting {:?} latency on '{}' (session {})",
            latency,
            resource.name,
            session_id
        );

        if let Err(e) = self.shaper.apply_latency(&resource.endpoint, latency).await {
            self.log_injection(session_id, "latency-apply", &resource.name, false, &e.to_string());
            // Best-effort cleanup even when application itself failed
            let _ = self.shaper.clear_latency(&resource.endpoint).await;
            self.end_session(&resource.name);
            return Err(HarnessError::FaultInjection {
                resource: resource.name.clone(),
                reason: format!("failed to apply latency: {e}"),
            });
        }
        self.log_injection(
            session_id,
            "latency-apply",
            &resource.name,
            true,
            &format!("{latency:?}"),
        );

        let result = op().await;

        let reverted = self.shaper.clear_latency(&resource.endpoint).await;
        self.log_injection(
            session_id,
            "latency-revert",
            &resource.name,
            reverted.is_ok(),
            &reverted
                .as_ref()
                .err()
                .map(|e| e.to_string())
                .unwrap_or_default(),
        );
        self.end_session(&resource.name);

        match (result, reverted) {
            // The operation's error wins; reversion was attempted regardless
            (Err(op_err), _) => Err(op_err),
            (Ok(value), Ok(())) => {
                tracing::info!("✅ Reverted latency on '{}'", resource.name);
                Ok(value)
            }
            (Ok(_), Err(e)) => Err(HarnessError::FaultInjection {
                resource: resource.name.clone(),
                reason: format!("failed to revert latency: {e}"),
            }),
        }
    }

    fn begin_session(&self, name: &ResourceName) -> HarnessResult<()> {
        let mut active = self
            .active_sessions
            .lock()
            .expect("fault session lock poisoned");
        if !active.insert(name.clone()) {
            return Err(HarnessError::FaultSessionActive { resource: name.clone() });
        }
        Ok(())
    }

    fn end_session(&self, name: &ResourceName) {
        let mut active = self
            .active_sessions
            .lock()
            .expect("fault session lock poisoned");
        active.remove(name);
    }

    fn log_injection(
        &self,
        session_id: Uuid,
        fault_type: &str,
        target: &ResourceName,
        success: bool,
        details: &str,
    ) {
        let event = InjectionEvent {
            timestamp: Utc::now(),
            session_id,
            fault_type: fault_type.to_string(),
            target: target.to_string(),
            success,
            details: details.to_string(),
        };

        self.injection_log
            .lock()
            .expect("injection log lock poisoned")
            .push(event);
    }

    /// Get the injection log for analysis
    pub fn injection_log(&self) -> Vec<InjectionEvent> {
        self.injection_log
            .lock()
            .expect("injection log lock poisoned")
            .clone()
    }
}

/// Network shaper backed by `tc`/netem on the device carrying the
/// resource's traffic
///
/// Requires CAP_NET_ADMIN; test suites normally substitute a mock or a
/// proxy-based shaper instead.
pub struct TcNetworkShaper {
    device: String,
}

impl TcNetworkShaper {
    pub fn new() -> Self {
        Self::on_device("lo")
    }

    pub fn on_device(device: &str) -> Self {
        Self {
            device: device.to_string(),
        }
    }

    async fn run_tc(&self, args: &[&str]) -> HarnessResult<()> {
        let output = tokio::process::Command::new("tc")
            .args(args)
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(HarnessError::Configuration {
                field: format!(
                    "tc {} failed: {}",
                    args.join(" "),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}

impl Default for TcNetworkShaper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NetworkShaper for TcNetworkShaper {
    async fn apply_latency(&self, _endpoint: &Endpoint, latency: Duration) -> HarnessResult<()> {
        let delay = format!("{}ms", latency.as_millis());
        self.run_tc(&[
            "qdisc", "add", "dev", &self.device, "root", "netem", "delay", &delay,
        ])
        .await
    }

    async fn clear_latency(&self, _endpoint: &Endpoint) -> HarnessResult<()> {
        self.run_tc(&["qdisc", "del", "dev", &self.device, "root", "netem"])
            .await
    }
}
