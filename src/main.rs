//! Internet 3.0 forward proxy (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                       ┌──────────────────────────────────────────────┐
//!   GET /proxy?url=X  ──────────▶│ http::server ──▶ fetch::client ──────────────┼──▶ Origin X
//!                                │                       │                      │
//!                                │                 text/html?                   │
//!                                │               yes │         │ no             │
//!                                │                   ▼         │                │
//!                                │   rewrite::links + banner   │                │
//!                                │                   │         │                │
//!                                │                   ▼         ▼                │
//!   Response  ◀──────────────────│         http::response (filter headers)      │
//!                                └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use internet3_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use internet3_proxy::observability::{logging, metrics};
use internet3_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "internet3-proxy", version)]
#[command(about = "Forward proxy that rewrites pages to keep navigation inside the proxy")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.set_port(port)?;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("internet3-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.upstream.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        banner_enabled = config.rewrite.banner_enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: std::net::SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
