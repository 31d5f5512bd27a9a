//! HTTP server command
//!
//! Runs the pharmd HTTP server with all routes.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use pharmd_core::AppConfig;
use pharmd_server::db::{create_pool, migrations};
use pharmd_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides PHARMD_BIND; default 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    // Environment config first, flags override
    let mut config = AppConfig::from_env()
        .context("Failed to load configuration. Set DATABASE_URL in the environment or .env")?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    tracing::info!("Starting pharmd server on {}", config.bind_addr);

    // Create database pool
    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    // Apply schema on startup
    migrations::run(&pool)
        .await
        .context("Failed to run schema migrations")?;

    // Configure server
    let server_config = ServerConfig {
        bind_addr: config.bind_addr,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(pool, server_config).await.context("Server error")?;

    Ok(())
}
