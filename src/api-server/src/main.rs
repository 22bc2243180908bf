//! User directory API server
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (0.0.0.0:8080) and the built-in seed
//! userdir-server
//!
//! # Custom address and seed file
//! userdir-server --host 127.0.0.1 --port 9090 --seed ./seed.json
//!
//! # Debug logging
//! RUST_LOG=debug userdir-server
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (trace, debug, info, warn, error)
//! - `USERDIR_HOST`: Server host (default: 0.0.0.0)
//! - `USERDIR_PORT`: Server port (default: 8080)
//! - `USERDIR_MAX_CONNECTIONS`: Max concurrent requests (default: 10000)
//! - `USERDIR_REQUEST_TIMEOUT`: Request timeout in seconds (default: 30)
//! - `USERDIR_SEED`: Path to a JSON seed file

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userdir_api_server::{AppState, Server, ServerConfig};
use userdir_authz::{EngineConfig, SeedData};

/// User directory API server
#[derive(Parser, Debug)]
#[command(
    name = "userdir-server",
    version,
    about = "REST API server for the user directory",
    long_about = None
)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "USERDIR_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value = "8080", env = "USERDIR_PORT")]
    port: u16,

    /// Maximum concurrent requests
    #[arg(long, default_value = "10000", env = "USERDIR_MAX_CONNECTIONS")]
    max_connections: usize,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", env = "USERDIR_REQUEST_TIMEOUT")]
    request_timeout: u64,

    /// Enable JSON logging format
    #[arg(long, env = "USERDIR_JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// JSON seed file with roles, groups and users; the built-in seed is used otherwise
    #[arg(long, env = "USERDIR_SEED")]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args);

    info!("Starting user directory API server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let seed = match &args.seed {
        Some(path) => SeedData::from_path(path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?,
        None => SeedData::builtin(),
    };

    let state = AppState::from_seed(EngineConfig::default(), seed)
        .context("Failed to initialize application state")?;
    info!(users = state.users.list().len(), "Application state initialized");

    let server = Server::new(
        ServerConfig {
            host: args.host.clone(),
            port: args.port,
            max_connections: args.max_connections,
            request_timeout: args.request_timeout,
        },
        state,
    );

    info!("Health check: http://{}:{}/health", args.host, args.port);
    info!("Metrics: http://{}:{}/metrics", args.host, args.port);
    info!("Press Ctrl+C to shutdown gracefully");

    if let Err(e) = server.run().await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Default filter when `RUST_LOG` holds a bare level
fn default_filter(level: tracing::Level) -> String {
    let deps = if level <= tracing::Level::INFO { "info" } else { "debug" };
    format!(
        "userdir_api_server={level},userdir_authz={level},tower_http={deps},axum={deps}",
        level = level.as_str().to_lowercase()
    )
}

/// Initialize tracing/logging subsystem
fn init_tracing(args: &Args) {
    let log_level = args.log_level.parse::<tracing::Level>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'info'", args.log_level);
        tracing::Level::INFO
    });

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(log_level).into());

    if args.json_logs {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}
