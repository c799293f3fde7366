//! Harness Runner
//!
//! Starts one embedded resource from CLI flags, prints its discoverable
//! configuration, and keeps it running until Ctrl+C when asked. Useful for
//! debugging a resource outside of a test suite.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use harness::{ProcessLauncher, ResourceConfig, ResourceManager};

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Embedded test-resource harness")]
struct Args {
    /// Resource name (lowercase alphanumerics and '-')
    #[arg(long, default_value = "graph-db")]
    name: String,

    /// Program to launch
    #[arg(long)]
    program: String,

    /// Arguments passed to the program
    #[arg(long = "resource-arg")]
    resource_args: Vec<String>,

    /// Port bindings, "name=port" or "name" for auto-assignment
    #[arg(long = "port", default_value = "bolt")]
    ports: Vec<String>,

    /// Directory the resource materializes into
    #[arg(long)]
    install_dir: Option<String>,

    /// Startup timeout in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Keep the resource running until Ctrl+C
    #[arg(long)]
    keep_running: bool,

    /// Print the published properties as JSON after startup
    #[arg(long)]
    dump_properties: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    shared::logging::init_tracing_with_level(Some(&args.log_level));

    let mut builder = ResourceConfig::builder(&args.name)
        .program(args.program.as_str())
        .startup_timeout(Duration::from_secs(args.timeout_secs));

    for arg in &args.resource_args {
        builder = builder.arg(arg.as_str());
    }
    for binding in &args.ports {
        match binding.split_once('=') {
            Some((name, port)) => builder = builder.port(name, Some(port.parse()?)),
            None => builder = builder.port(binding.as_str(), None),
        }
    }
    if let Some(dir) = &args.install_dir {
        builder = builder.install_dir(dir.as_str());
    }

    let config = builder.build()?;
    let manager = ResourceManager::new(Arc::new(ProcessLauncher::new()));

    let resource = manager.start(config).await?;
    let Some(resource) = resource else {
        tracing::warn!("⏭️ Resource was disabled, nothing started");
        return Ok(());
    };

    if args.dump_properties {
        let snapshot = manager.properties().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    if args.keep_running {
        tracing::info!("🔄 Resource '{}' running, press Ctrl+C to stop", resource.name);
        tokio::signal::ctrl_c().await?;
    }

    manager.stop_all().await?;
    Ok(())
}
