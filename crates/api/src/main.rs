//! Generator Diagnostics - Main Entry Point

use anyhow::Context;
use api::{build_app, init_logging, install_metrics_recorder, AppConfig};
use std::net::SocketAddr;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var("GENDIAG_CONFIG").unwrap_or_else(|_| api::config::DEFAULT_CONFIG_FILE.to_string());
    let config = AppConfig::load(&path).with_context(|| format!("loading configuration from {path}"))?;
    init_logging(&config.logging).context("initializing logging")?;

    info!("=== Generator Diagnostics v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = match install_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed: {}", e);
            None
        }
    };
    let app = build_app(&config, metrics).context("building application")?;

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Starting API server on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
