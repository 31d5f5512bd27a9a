//! Database layer: bootstrap, pool, migrations, and repositories

pub mod bootstrap;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use bootstrap::{ensure_database, CatalogError, EnsureStatus};
pub use pool::{create_admin_pool, create_pool, create_pool_with_options};
