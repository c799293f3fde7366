//! Real resource launcher backed by child processes
//!
//! Spawns the resource program with piped stdio and the resolved endpoint
//! exported through environment variables, and tears it down with SIGTERM
//! followed by SIGKILL if the grace period runs out.

use std::process::Stdio;
use std::time::Duration;

use shared::{Endpoint, ResourceName};
use tokio::process::Command;
use tokio::time::sleep;

use crate::config::ResourceConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::traits::{LaunchedResource, ResourceLauncher};

const TERMINATION_GRACE: Duration = Duration::from_millis(1000);

#[derive(Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Environment exported to the child: host, per-binding ports,
    /// credentials and the install directory
    fn child_environment(config: &ResourceConfig, endpoint: &Endpoint) -> Vec<(String, String)> {
        let prefix = config.name.as_str().replace('-', "_").to_uppercase();
        let mut env = vec![
            (format!("{prefix}_HOST"), endpoint.host.clone()),
            (format!("{prefix}_USER"), config.credentials.user.clone()),
            (
                format!("{prefix}_PASSWORD"),
                config.credentials.password.clone(),
            ),
        ];

        for binding in &endpoint.ports {
            env.push((
                format!("{}_{}_PORT", prefix, binding.name.to_uppercase()),
                binding.port.to_string(),
            ));
        }

        if let Some(dir) = &config.install_dir {
            env.push((
                format!("{prefix}_INSTALL_DIR"),
                dir.to_string_lossy().to_string(),
            ));
        }

        env
    }

    /// Check if a process is still running
    fn is_process_running(child: &mut tokio::process::Child) -> bool {
        match child.try_wait() {
            Ok(None) => true,     // Still running
            Ok(Some(_)) => false, // Exited
            Err(_) => false,      // Error checking status
        }
    }

    #[cfg(unix)]
    fn terminate_gracefully(pid: u32) -> HarnessResult<()> {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(|e| {
            HarnessError::Configuration {
                field: format!("failed to signal pid {pid}: {e}"),
            }
        })
    }
}

#[async_trait::async_trait]
impl ResourceLauncher for ProcessLauncher {
    async fn launch(
        &self,
        config: &ResourceConfig,
        endpoint: &Endpoint,
    ) -> HarnessResult<LaunchedResource> {
        let program = config
            .program
            .as_ref()
            .ok_or_else(|| HarnessError::Configuration {
                field: format!("resource '{}' has no program", config.name),
            })?;

        let mut cmd = Command::new(program);
        cmd.args(&config.args);
        for (key, value) in Self::child_environment(config, endpoint) {
            cmd.env(key, value);
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());

        let child = cmd.spawn().map_err(|e| HarnessError::ResourceStartup {
            name: config.name.clone(),
            reason: format!("failed to spawn '{program}': {e}"),
        })?;

        tracing::info!(
            "🚀 Spawned '{}' (PID: {}) at {}",
            config.name,
            child.id().unwrap_or(0),
            endpoint.host
        );

        Ok(LaunchedResource {
            endpoint: endpoint.clone(),
            child: Some(child),
        })
    }

    async fn terminate(
        &self,
        name: &ResourceName,
        launched: &mut LaunchedResource,
    ) -> HarnessResult<()> {
        let Some(child) = launched.child.as_mut() else {
            return Ok(());
        };

        // SIGTERM first for graceful shutdown
        #[cfg(unix)]
        if let Some(pid) = child.id() {
            if let Err(e) = Self::terminate_gracefully(pid) {
                tracing::warn!("⚠️ Failed to terminate '{}' gracefully: {}", name, e);
            }
        }

        sleep(TERMINATION_GRACE).await;

        if Self::is_process_running(child) {
            tracing::warn!("🔨 Force killing '{}'", name);
            child.kill().await.map_err(|e| HarnessError::Configuration {
                field: format!("failed to kill '{name}': {e}"),
            })?;
        }

        let _ = child.wait().await;
        launched.child = None;

        tracing::info!("🛑 Terminated '{}'", name);
        Ok(())
    }
}
