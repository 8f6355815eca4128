//! Gamepass aggregation gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                   GAMEPASS GATEWAY                     │
//!                      │                                                        │
//!   Client Request     │  ┌────────┐    ┌──────────┐    ┌──────────────────┐   │
//!   ───────────────────┼─▶│  http  │───▶│ handlers │───▶│   aggregation    │   │
//!                      │  │ server │    │          │    │     pipeline     │   │
//!                      │  └────────┘    └──────────┘    └────────┬─────────┘   │
//!                      │                                         │             │
//!                      │                                         ▼             │
//!   Client Response    │  ┌──────────┐                   ┌──────────────┐      │
//!   ◀──────────────────┼──│ response │◀──────────────────│   upstream   │◀─────┼── Platform
//!                      │  │  (JSON)  │                   │    client    │      │   REST APIs
//!                      │  └──────────┘                   └──────────────┘      │
//!                      │                                                        │
//!                      │  Cross-cutting: config · observability · lifecycle    │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use gamepass_proxy::config::resolve_config;
use gamepass_proxy::lifecycle::{signals, Shutdown};
use gamepass_proxy::observability::{logging, metrics};
use gamepass_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "gamepass-proxy")]
#[command(about = "Aggregates a user's experiences and gamepasses into one JSON response", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GAMEPASS_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_tracing(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        max_experiences = config.aggregation.max_experiences,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "gamepass-proxy starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_socket_addr() {
            Some(addr) => metrics::init_metrics(addr),
            None => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Server running");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::termination().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
