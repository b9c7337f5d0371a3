//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while running the HTTP surface.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listen address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Logging could not be initialised.
    #[error("logging initialization failed: {0}")]
    LoggingInit(String),

    /// IO error while serving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
