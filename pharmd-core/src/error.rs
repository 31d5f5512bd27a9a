/// Structured error types for pharmd-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (pharmd-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
use thiserror::Error;

/// Main error type for pharmd-core operations
#[derive(Error, Debug)]
pub enum PharmError {
    /// Configuration value missing or malformed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// A required environment variable is not set
    #[error("Missing required environment variable '{name}'")]
    MissingEnv { name: String },

    /// A value failed to parse (bind addresses, ports)
    #[error("Invalid value for {field}: '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for pharmd-core operations
pub type Result<T> = std::result::Result<T, PharmError>;

impl PharmError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a missing environment variable error
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::MissingEnv { name: name.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
