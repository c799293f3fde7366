//! Readiness probing for launched resources
//!
//! A resource counts as ready once its probe port accepts a TCP connection.
//! No protocol handshake is attempted; the driver speaking the actual wire
//! protocol is an external collaborator.

use std::time::Duration;

use shared::ResourceName;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};

use crate::error::{HarnessError, HarnessResult};

const CONNECT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Block until `address` accepts a TCP connection or `startup_timeout` elapses
pub async fn wait_until_ready(
    name: &ResourceName,
    address: &str,
    startup_timeout: Duration,
) -> HarnessResult<()> {
    let deadline = Instant::now() + startup_timeout;

    tracing::debug!("⏳ Probing '{}' at {} (max: {:?})", name, address, startup_timeout);

    loop {
        match timeout(CONNECT_ATTEMPT_TIMEOUT, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => {
                tracing::debug!("✅ '{}' accepted a connection at {}", name, address);
                return Ok(());
            }
            Ok(Err(_)) | Err(_) => {
                if Instant::now() >= deadline {
                    return Err(HarnessError::ResourceStartup {
                        name: name.clone(),
                        reason: format!(
                            "did not become ready at {address} within {startup_timeout:?}"
                        ),
                    });
                }
                sleep(RETRY_INTERVAL).await;
            }
        }
    }
}
