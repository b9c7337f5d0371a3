//! Error types for the overlay-network gate.

use thiserror::Error;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Errors that can occur while managing the gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// Client name is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid client name: {0:?}")]
    InvalidClientName(String),

    /// No stop commands are configured.
    #[error("no gate commands configured")]
    NoCommands,

    /// Every configured stop command failed.
    #[error("all {attempted} gate commands failed")]
    AllCommandsFailed {
        /// Number of commands tried.
        attempted: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
