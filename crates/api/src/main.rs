//! Stroke Risk Service - Main Entry Point

use api::{init_logging, run_server, ServiceConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServiceConfig::load(config_path.as_deref())?;

    init_logging(&config.logging);

    info!("=== Stroke Risk Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Loading artifacts from {} (fallback policy: {:?})",
        config.artifacts.dir.display(),
        config.pipeline.fallback_policy
    );

    run_server(config).await?;

    Ok(())
}
