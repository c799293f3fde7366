//! Shared logging utilities for consistent tracing across harness runs

use chrono::{DateTime, Utc};

/// Initialize tracing subscriber with the default `info` level
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Initialize tracing subscriber with an explicit base level
///
/// `RUST_LOG` still wins when set, so test runs can be made noisier without
/// touching harness configuration.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let base_level = log_level.unwrap_or("info");
    let default_filter = format!("harness={base_level},shared={base_level}");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    // try_init: tests may initialize more than once per process
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}
