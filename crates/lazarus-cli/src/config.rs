//! Deployment configuration file.
//!
//! Every table is optional; a missing file at the default location means
//! "all defaults".
//!
//! ```toml
//! [recovery]
//! total_shares = 5
//! threshold = 3
//! max_attempts = 3
//! min_response_ms = 5000
//! hash_file = "/var/lib/lazarus/lazarus.hash"
//!
//! [gate]
//! hidden_service_dir = "/var/lib/tor/lazarus"
//!
//! [remediation]
//! commands = [{ program = "iptables", args = ["-F"] }]
//!
//! [server]
//! listen = "127.0.0.1:9999"
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lazarus_gate::{GateConfig, validate_client_name};
use lazarus_recovery::{RecoveryConfig, RemediationConfig, SetupConfig};
use lazarus_server::{LoggingConfig, ServerConfig};
use serde::Deserialize;
use tracing::warn;

/// Used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/lazarus/lazarus.toml";

/// Smallest `recovery.min_response_ms` a deployment may run with.
pub const MIN_RESPONSE_FLOOR_MS: u64 = 1000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazarusConfig {
    pub recovery: RecoveryConfig,
    pub gate: GateConfig,
    pub remediation: RemediationConfig,
    pub server: ServerConfig,
    pub setup: SetupConfig,
    pub logging: LoggingConfig,
}

impl LazarusConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_PATH`] if it exists.
    ///
    /// An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse TOML text.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reject configurations that cannot work.
    pub fn validate(&self) -> Result<()> {
        self.recovery.validate()?;
        if self.recovery.min_response_ms < MIN_RESPONSE_FLOOR_MS {
            anyhow::bail!(
                "recovery.min_response_ms must be at least {MIN_RESPONSE_FLOOR_MS} (got {})",
                self.recovery.min_response_ms
            );
        }
        validate_client_name(&self.gate.client_name)?;
        if self.gate.stop_commands.is_empty() {
            anyhow::bail!("gate.stop_commands must not be empty");
        }
        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be positive");
        }
        if !self.server.listen.ip().is_loopback() {
            warn!(
                listen = %self.server.listen,
                "recovery endpoint is not bound to loopback"
            );
        }
        Ok(())
    }
}
