//! Domain model types and validation

pub mod ident;
pub mod validation;

pub use ident::PgIdent;
pub use validation::ValidationError;
