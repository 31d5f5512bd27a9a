//! pharmd-server: Postgres-backed pharmacy API
//!
//! Provides the catalog bootstrap (idempotent database creation), the
//! schema migrations, repository layer, and the axum HTTP surface for
//! users, items, and orders.

pub mod db;
pub mod http;
pub mod models;

pub use db::bootstrap::{ensure_database, CatalogError, EnsureStatus};
pub use db::pool::create_pool;
pub use http::{run_server, ServerConfig};
pub use models::PgIdent;
