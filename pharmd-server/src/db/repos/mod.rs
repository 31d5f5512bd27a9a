//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Single queries per operation where possible
//! - Transactions for multi-step operations (order creation)
//! - NotFound carries resource name and id for the HTTP layer

pub mod items;
pub mod orders;
pub mod users;

pub use items::{Item, ItemPatch, ItemRepo};
pub use orders::{NewOrderLine, Order, OrderRepo};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {reason}")]
    Conflict { reason: String },
}

/// SQLSTATE: unique_violation
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

impl DbError {
    /// Map a unique-constraint violation to `Conflict`, everything
    /// else to `Sqlx`.
    pub(crate) fn on_insert(e: sqlx::Error, reason: &str) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION) {
                return Self::Conflict {
                    reason: reason.to_owned(),
                };
            }
        }
        Self::Sqlx(e)
    }
}
