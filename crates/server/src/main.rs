//! Driftmail server binary.

use anyhow::{Context, Result};
use clap::Parser;
use driftmail_core::config::AppConfig;
use driftmail_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Driftmail - disposable inbox server
#[derive(Parser, Debug)]
#[command(name = "driftmaild")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DRIFTMAIL_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Driftmail v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    // Check for DRIFTMAIL_ environment variables (excluding DRIFTMAIL_CONFIG
    // which is just the path)
    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("DRIFTMAIL_") && key != "DRIFTMAIL_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: driftmaild --config /path/to/config.toml\n  \
             2. Environment variables: DRIFTMAIL_SERVER__BIND=0.0.0.0:8080 \
             DRIFTMAIL_MAIL__DOMAIN=drift.example driftmaild\n\n\
             See config/server.example.toml for example configuration.\n\
             Set DRIFTMAIL_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DRIFTMAIL_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    config
        .mail
        .validate()
        .context("invalid mail configuration")?;

    // Register Prometheus metrics
    driftmail_server::metrics::register_metrics();

    // Initialize metadata store
    let metadata = driftmail_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store initialized");

    // Create application state
    let state = AppState::new(config.clone(), metadata);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    let router = create_router(state);

    tracing::info!(
        bind = %addr,
        domain = %config.mail.domain,
        "Driftmail server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
