//! Transport error types.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors produced by the transport controller.
#[derive(Error, Debug)]
pub enum TransportError {
    /// A playlist must contain at least one entry.
    #[error("Playlist must contain at least one entry")]
    EmptyPlaylist,

    /// Invalid transport configuration.
    #[error("Invalid transport configuration: {0}")]
    Config(String),

    /// An engine bridge call failed.
    #[error("Engine error: {0}")]
    Engine(#[from] BridgeError),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
