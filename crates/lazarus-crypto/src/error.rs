//! Error types for Lazarus cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The operating system could not supply secure randomness.
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// Invalid key or secret length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// A stored digest could not be parsed.
    #[error("invalid digest encoding: {0}")]
    InvalidDigest(String),
}

/// Result type alias for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
