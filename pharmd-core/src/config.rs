//! Environment-driven configuration for pharmd.
//!
//! All knobs come from the process environment (optionally seeded from
//! a `.env` file in the current directory):
//!
//!   DATABASE_URL        application database connection string
//!   PHARMD_ADMIN_URL    maintenance connection for `db ensure`
//!                       (defaults to DATABASE_URL)
//!   PHARMD_DB_NAME      database to ensure exists (default: app)
//!   PHARMD_DB_OWNER     owner role for that database (default: app)
//!   PHARMD_BIND         HTTP bind address (default: 127.0.0.1:8000)

use std::env;
use std::net::SocketAddr;

use crate::error::{PharmError, Result};

/// Default database name created by the bootstrap step.
pub const DEFAULT_DB_NAME: &str = "app";

/// Default owner role for the bootstrapped database.
pub const DEFAULT_DB_OWNER: &str = "app";

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Load environment variables from a `.env` file in the current
/// directory, if one exists.
///
/// dotenvy never overwrites variables already set in the environment,
/// so real environment always wins over file contents.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded .env from {}", path.display()),
        Err(e) if e.not_found() => {
            tracing::debug!("No .env file found, using environment variables only");
        }
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }
}

/// Configuration for the pharmd HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application database connection string
    pub database_url: String,

    /// HTTP bind address
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Build server configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is unset or `PHARMD_BIND` does not
    /// parse as a socket address.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| PharmError::missing_env("DATABASE_URL"))?;

        let bind = env::var("PHARMD_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind.parse().map_err(|_| {
            PharmError::invalid_value("PHARMD_BIND", bind.clone(), "expected host:port")
        })?;

        Ok(Self {
            database_url,
            bind_addr,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/app".to_string(),
            bind_addr: DEFAULT_BIND.parse().expect("default bind address is valid"),
        }
    }
}

/// Database descriptor for the bootstrap: which database to ensure,
/// which role owns it, and how to reach the catalog. Constructed at
/// process start, consulted once, then discarded.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Maintenance connection string. Must point at a database that
    /// already exists (typically `postgres`); `None` when neither
    /// `PHARMD_ADMIN_URL` nor `DATABASE_URL` is set.
    pub admin_url: Option<String>,

    /// Name of the database the bootstrap ensures exists
    pub db_name: String,

    /// Owner role for the bootstrapped database. The role itself is
    /// expected to exist already; the bootstrap never creates it.
    pub db_owner: String,
}

impl BootstrapConfig {
    /// Build the descriptor from the process environment.
    ///
    /// Unlike [`AppConfig::from_env`] this never fails: the name and
    /// owner default to `app`, and a missing maintenance URL is left
    /// for the caller to reject once flag overrides have been applied.
    pub fn from_env() -> Self {
        Self {
            admin_url: env::var("PHARMD_ADMIN_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .ok(),
            db_name: env::var("PHARMD_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            db_owner: env::var("PHARMD_DB_OWNER")
                .unwrap_or_else(|_| DEFAULT_DB_OWNER.to_string()),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_url: None,
            db_name: DEFAULT_DB_NAME.to_string(),
            db_owner: DEFAULT_DB_OWNER.to_string(),
        }
    }
}
