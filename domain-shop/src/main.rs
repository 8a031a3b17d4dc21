//! domain-shop - HTTP API for domain availability, generation and purchase.
//!
//! Reads config from an optional TOML file plus env vars:
//!   DOMAIN_SHOP_CONFIG - path to the TOML file (same as --config)
//!   ENOM_RESELLER_ID, ENOM_RESELLER_PASSWORD - reseller credentials (required)
//!   ENOM_TEST_MODE - use the reseller test environment (default: true)
//!   ENOM_TIMEOUT - registrar request timeout, e.g. "30s" (default: 30s)
//!   DIFY_API_KEY - generation workflow key (required)
//!   DIFY_WORKFLOW_URL - generation workflow endpoint
//!   DIFY_USER - user id sent with each workflow run (default: domain-shop)
//!   DIFY_TIMEOUT - workflow request timeout (default: 60s)
//!   DOMAIN_SHOP_BIND - listen address (default: 0.0.0.0:8000)

use std::path::PathBuf;
use std::process;

use clap::Parser;
use domain_shop::{build_router, AppState};
use domain_shop_lib::Settings;
use tokio::net::TcpListener;

/// CLI arguments for domain-shop
#[derive(Parser, Debug)]
#[command(name = "domain-shop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP API for checking, generating and purchasing domain names")]
pub struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long = "config", env = "DOMAIN_SHOP_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listen address, overrides the configured one
    #[arg(short = 'b', long = "bind", env = "DOMAIN_SHOP_BIND", value_name = "ADDR")]
    pub bind: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,domain_shop=debug,domain_shop_lib=debug".into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(args.config.as_deref())?;
    tracing::info!(
        environment = ?settings.registrar.credentials.environment(),
        workflow_url = %settings.generation.workflow_url,
        "configuration loaded"
    );

    let state = AppState::from_settings(&settings)?;
    let app = build_router(state);

    let bind_addr = args.bind.unwrap_or(settings.server.bind);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("failed to bind to {bind_addr}: {e}"))?;
    tracing::info!("domain-shop listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("domain-shop stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
