//! pharmd CLI - pharmacy backend server and database bootstrap
//!
//! This is the main entry point for the pharmd command-line tool, which provides:
//! - HTTP API server for users, items, and orders (`serve` subcommand)
//! - Idempotent database creation and schema migrations (`db` subcommand)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "pharmd",
    author,
    version,
    about = "Pharmacy backend: HTTP API server with Postgres bootstrap",
    long_about = "Run the pharmacy HTTP API, ensure the application database exists \
                  (created with the configured owner only when absent), and apply \
                  the schema migrations."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server (users, items, orders, health)
    Serve(commands::serve::ServeArgs),
    /// Database operations (ensure, migrate)
    Db(commands::db::DbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init_tracing(&TracingConfig { debug: cli.debug })?;
    pharmd_core::config::load_dotenv();

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Db(args) => commands::db::run_db(args).await,
    }
}
