//! Runtime error types.

use thiserror::Error;

/// Errors produced by the runtime infrastructure.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (e.g., a malformed log filter).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The logging system was already initialized.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
