//! Database subcommands: ensure and migrate
//!
//! `db ensure` is the deployment bootstrap: connect to a maintenance
//! database and create the application database with its owner role
//! only if it does not already exist. `db migrate` applies the schema
//! DDL to the application database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pharmd_core::BootstrapConfig;
use pharmd_server::db::{create_admin_pool, create_pool, ensure_database, migrations};
use pharmd_server::models::PgIdent;
use pharmd_server::EnsureStatus;

/// Arguments for the db command
#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the application database if it does not exist
    Ensure(EnsureArgs),
    /// Apply schema migrations to the application database
    Migrate(MigrateArgs),
}

/// Arguments for `db ensure`
#[derive(Parser, Debug)]
pub struct EnsureArgs {
    /// Maintenance connection URL; must point at an existing database
    /// (typically `postgres`). Overrides PHARMD_ADMIN_URL/DATABASE_URL.
    #[arg(long)]
    pub admin_url: Option<String>,

    /// Name of the database to ensure exists (overrides PHARMD_DB_NAME;
    /// default: app)
    #[arg(long)]
    pub name: Option<String>,

    /// Owner role for the database; must already exist (overrides
    /// PHARMD_DB_OWNER; default: app)
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for `db migrate`
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Fully resolved bootstrap target
#[derive(Debug)]
struct EnsureTarget {
    admin_url: String,
    name: PgIdent,
    owner: PgIdent,
}

/// Resolve the bootstrap target: flags override the environment
/// descriptor, and both identifiers are validated before any
/// connection is attempted.
fn resolve_target(args: EnsureArgs, config: BootstrapConfig) -> Result<EnsureTarget> {
    let admin_url = args
        .admin_url
        .or(config.admin_url)
        .context("No maintenance URL. Pass --admin-url or set PHARMD_ADMIN_URL/DATABASE_URL")?;

    let name_raw = args.name.unwrap_or(config.db_name);
    let owner_raw = args.owner.unwrap_or(config.db_owner);

    let name = PgIdent::new(&name_raw)
        .with_context(|| format!("invalid database name '{}'", name_raw))?;
    let owner = PgIdent::new(&owner_raw)
        .with_context(|| format!("invalid owner role '{}'", owner_raw))?;

    Ok(EnsureTarget {
        admin_url,
        name,
        owner,
    })
}

/// Dispatch db subcommands
pub async fn run_db(args: DbArgs) -> Result<()> {
    match args.command {
        DbCommand::Ensure(args) => run_ensure(args).await,
        DbCommand::Migrate(args) => run_migrate(args).await,
    }
}

/// Run the idempotent database creator
async fn run_ensure(args: EnsureArgs) -> Result<()> {
    let target = resolve_target(args, BootstrapConfig::from_env())?;

    let admin = create_admin_pool(&target.admin_url)
        .await
        .context("Failed to connect to maintenance database")?;

    let status = ensure_database(&admin, &target.name, &target.owner).await?;
    match status {
        EnsureStatus::Created => {
            tracing::info!(database = %target.name, owner = %target.owner, "Database created");
        }
        EnsureStatus::AlreadyExists => {
            tracing::info!(database = %target.name, "Database already exists, nothing to do");
        }
    }

    Ok(())
}

/// Apply the schema DDL
async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url or the environment")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run schema migrations")?;

    Ok(())
}
