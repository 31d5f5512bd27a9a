//! pharmd-core: shared configuration and error types for the pharmd
//! workspace.
//!
//! Keeps the pieces both the server library and the CLI binary need:
//! environment-driven configuration (database URLs, bootstrap
//! descriptor, bind address) and the structured error type.

pub mod config;
pub mod error;

pub use config::{AppConfig, BootstrapConfig};
pub use error::{PharmError, Result};
