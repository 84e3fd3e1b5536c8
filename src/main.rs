//! Edge Request Security Shield
//!
//! A stateless filter in front of every page request. Each request is
//! classified before any application logic runs and is either answered here
//! (blocked, trapped) or forwarded to the origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────────┐
//!                         │                 SECURITY SHIELD                    │
//!                         │                                                    │
//!   Client Request        │  ┌─────────┐   ┌───────────┐   ┌──────────────┐   │
//!   ──────────────────────┼─▶│  http   │──▶│ exclusion │──▶│  classifier  │   │
//!                         │  │ server  │   │ (assets)  │   │ (rule tables)│   │
//!                         │  └─────────┘   └─────┬─────┘   └──────┬───────┘   │
//!                         │                      │ excluded       │ decision  │
//!                         │                      │                ▼           │
//!                         │                      │         ┌──────────────┐   │
//!                         │                      │         │ event logger │──┼──▶ stdout (JSON lines)
//!                         │                      │         └──────┬───────┘   │
//!                         │                      ▼                ▼           │
//!   Client Response       │               ┌──────────┐     ┌──────────────┐   │
//!   ◀─────────────────────┼───────────────│ upstream │◀────│ synthesizer  │   │
//!                         │               │ forward  │pass │ 400/403/404  │   │
//!                         │               └────┬─────┘     └──────────────┘   │
//!                         └────────────────────┼───────────────────────────────┘
//!                                              ▼
//!                                        Origin server
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use security_shield::config::{load_config, AppConfig};
use security_shield::observability::{logging, metrics};
use security_shield::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "security-shield")]
#[command(about = "Edge request security filter", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SHIELD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability)?;

    tracing::info!("security-shield v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    // Rule tables compile here; a bad pattern stops startup.
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
