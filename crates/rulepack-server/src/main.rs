//! Rulepack HTTP Server
//!
//! Loads rule documents and the pack manifest, then serves them over HTTP
//! until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use rulepack_repository::RepositoryLoader;
use rulepack_server::api;
use rulepack_server::config::{Cli, LogFormat, ServerConfig};
use rulepack_server::lifecycle::{self, LifecyclePhase, ShutdownOutcome};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load configuration
    let config = ServerConfig::load(&cli)?;

    // Initialize tracing
    init_tracing(&config)?;
    info!("Loaded configuration: {:?}", config);

    info!(
        phase = %LifecyclePhase::Loading,
        "loading rules from {}",
        config.rules_dir.display()
    );
    let registry = RepositoryLoader::new(config.repository_config())
        .load_all()
        .await
        .context("Failed to load rules")?;

    let app = api::create_router(Arc::new(registry));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("listening on {}", config.listen);

    let outcome = lifecycle::serve_until(
        listener,
        app,
        lifecycle::shutdown_signal(),
        config.shutdown_grace(),
    )
    .await?;

    if outcome == ShutdownOutcome::TimedOut {
        warn!("forced shutdown after {:?}", config.shutdown_grace());
    }

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "rulepack_server={level},rulepack_repository={level},tower_http=debug",
            level = config.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
