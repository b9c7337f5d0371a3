//! Recovery configuration (`[recovery]`, `[remediation]` and `[setup]` tables).
//!
//! Every field has a default so an empty file describes the reference
//! deployment: 3-of-5 shares, three attempts, five-second responses.

use std::path::PathBuf;
use std::time::Duration;

use lazarus_gate::ShellCommand;
use serde::{Deserialize, Serialize};

use crate::error::{RecoveryError, RecoveryResult};

/// Core recovery policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Number of shares generated (`n`).
    #[serde(default = "default_total_shares")]
    pub total_shares: u8,

    /// Shares required to reconstruct (`k`).
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// Failed attempts before the gate is taken down.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum wall-clock duration of every recovery attempt.
    #[serde(default = "default_min_response_ms")]
    pub min_response_ms: u64,

    /// Verification hash location.
    #[serde(default = "default_hash_file")]
    pub hash_file: PathBuf,

    /// Whether malformed submissions consume an attempt.
    #[serde(default)]
    pub count_malformed_attempts: bool,

    /// Whether rejections tell the caller how many attempts remain.
    #[serde(default)]
    pub expose_remaining_attempts: bool,
}

const fn default_total_shares() -> u8 {
    5
}

const fn default_threshold() -> u8 {
    3
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_min_response_ms() -> u64 {
    5000
}

fn default_hash_file() -> PathBuf {
    PathBuf::from("/var/lib/lazarus/lazarus.hash")
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            total_shares: default_total_shares(),
            threshold: default_threshold(),
            max_attempts: default_max_attempts(),
            min_response_ms: default_min_response_ms(),
            hash_file: default_hash_file(),
            count_malformed_attempts: false,
            expose_remaining_attempts: false,
        }
    }
}

impl RecoveryConfig {
    /// Minimum response duration.
    #[must_use]
    pub const fn min_response(&self) -> Duration {
        Duration::from_millis(self.min_response_ms)
    }

    /// Check share counts and attempt limit.
    ///
    /// `total_shares` is a `u8`, so the `n <= 255` bound holds by type.
    ///
    /// # Errors
    /// Returns [`RecoveryError::Config`] if `k < 2`, `n < k` or `max_attempts == 0`.
    pub fn validate(&self) -> RecoveryResult<()> {
        if self.threshold < 2 {
            return Err(RecoveryError::Config(format!(
                "threshold must be at least 2, got {}",
                self.threshold
            )));
        }
        if self.total_shares < self.threshold {
            return Err(RecoveryError::Config(format!(
                "total_shares ({}) must be at least threshold ({})",
                self.total_shares, self.threshold
            )));
        }
        if self.max_attempts == 0 {
            return Err(RecoveryError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remediation run after a successful recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationConfig {
    /// Commands run in order; the first failure aborts.
    #[serde(default = "default_remediation_commands")]
    pub commands: Vec<ShellCommand>,
}

fn default_remediation_commands() -> Vec<ShellCommand> {
    vec![
        ShellCommand::new("iptables", ["-P", "INPUT", "ACCEPT"]),
        ShellCommand::new("iptables", ["-F"]),
    ]
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            commands: default_remediation_commands(),
        }
    }
}

/// One-time setup options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Staging file for the administrator credential. Shredded after disclosure.
    #[serde(default = "default_admin_key_staging")]
    pub admin_key_staging: PathBuf,
}

fn default_admin_key_staging() -> PathBuf {
    PathBuf::from("/var/lib/lazarus/admin.auth_private")
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            admin_key_staging: default_admin_key_staging(),
        }
    }
}
