//! node-restful: REST gateway of a blockchain node.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net (plain/TLS listener)
//!                       │
//!                       ▼
//!                     http::Dispatcher ── preflight? ──▶ empty 200
//!                       │
//!                       ▼
//!                     routing::ActionRegistry (GET/POST tables)
//!                       │
//!                       ▼
//!                     security::AuthorizationGate ── denied ──▶ error envelope
//!                       │
//!                       ▼
//!                     http::request (ParamMap) → api handler
//!                       │            ├─ blockchain::NodeService
//!                       │            ├─ blockchain::PushNotifier
//!                       │            ├─ config::RuntimeSettings
//!                       │            └─ lifecycle::RestartHandle
//!                       ▼
//!     ◀────────────── http::response (Envelope JSON + CORS)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use node_restful::blockchain::{DetachedNode, DetachedPush};
use node_restful::config::{loader, validate_config, ConfigError, ServerConfig};
use node_restful::lifecycle::{self, signals, Collaborators, Shutdown};
use node_restful::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "node-restful", version, about = "REST gateway of a blockchain node")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override `rest.http_rest_port`.
    #[arg(short, long)]
    port: Option<u16>,
}

fn load(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = if cli.config.exists() {
        loader::parse_config(&std::fs::read_to_string(&cli.config)?)?
    } else {
        eprintln!("config file {:?} not found, using defaults", cli.config);
        ServerConfig::default()
    };

    if let Some(port) = cli.port {
        config.rest.http_rest_port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "node-restful starting");

    tracing::info!(
        port = config.rest.http_rest_port,
        tls = config.rest.use_tls(),
        ws_port = config.websocket.http_ws_port,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let assembled = lifecycle::assemble(
        config,
        Collaborators {
            node: Arc::new(DetachedNode),
            push: Arc::new(DetachedPush),
            validator: None,
        },
    )?;

    let shutdown = Arc::new(Shutdown::new());
    let stopped = shutdown.signalled();
    tokio::spawn({
        let shutdown = Arc::clone(&shutdown);
        async move {
            signals::shutdown_signal().await;
            shutdown.trigger();
        }
    });

    assembled.server.run(assembled.restarts, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
