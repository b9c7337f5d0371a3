//! Recovery error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for recovery operations.
pub type RecoveryResult<T> = Result<T, RecoveryError>;

/// Errors that can occur during setup and recovery.
///
/// No variant ever carries secret material.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// A verification hash already exists; regenerating would orphan
    /// previously distributed shares.
    #[error("verification hash already exists at {path}")]
    AlreadyInitialized {
        /// Existing hash file.
        path: PathBuf,
    },

    /// No verification hash has been created yet.
    #[error("verification hash not found at {path}")]
    NotInitialized {
        /// Expected hash file.
        path: PathBuf,
    },

    /// The hash file is readable or writable by group/other.
    #[error("insecure permissions {mode:o} on {path}; expected owner-only access")]
    InsecurePermissions {
        /// Offending file.
        path: PathBuf,
        /// Permission bits found.
        mode: u32,
    },

    /// The hash file does not contain a valid digest.
    #[error("corrupt verification hash at {path}: {reason}")]
    CorruptHash {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        reason: String,
    },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Cryptographic error.
    #[error("cryptographic error: {0}")]
    Crypto(#[from] lazarus_crypto::CryptoError),

    /// Secret sharing error.
    #[error("secret sharing error: {0}")]
    Shamir(#[from] lazarus_crypto::ShamirError),

    /// Gate error.
    #[error("gate error: {0}")]
    Gate(#[from] lazarus_gate::GateError),

    /// One-time disclosure could not be completed.
    #[error("disclosure failed: {0}")]
    Disclosure(String),

    /// Remediation action failed.
    #[error("remediation failed: {0}")]
    Remediation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
