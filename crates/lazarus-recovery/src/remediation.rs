//! Action run after a successful recovery.
//!
//! The default restores a default-allow firewall. Failures are reported to the
//! operator and never retried; the recovery itself has already succeeded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use lazarus_gate::{CommandOutcome, ShellCommand};
use tracing::{error, info};

use crate::config::RemediationConfig;
use crate::error::{RecoveryError, RecoveryResult};

/// Idempotent remediation invoked on a granted recovery.
#[async_trait]
pub trait RemediationAction: Send + Sync {
    /// Restore access.
    async fn restore(&self) -> RecoveryResult<()>;
}

/// Remediation backed by external commands run in order.
#[derive(Debug, Clone)]
pub struct CommandRemediation {
    commands: Vec<ShellCommand>,
}

impl CommandRemediation {
    /// Create from a command list.
    #[must_use]
    pub const fn new(commands: Vec<ShellCommand>) -> Self {
        Self { commands }
    }

    /// Create from configuration.
    #[must_use]
    pub fn from_config(config: &RemediationConfig) -> Self {
        Self::new(config.commands.clone())
    }
}

#[async_trait]
impl RemediationAction for CommandRemediation {
    async fn restore(&self) -> RecoveryResult<()> {
        for command in &self.commands {
            match command.run().await {
                Ok(CommandOutcome::Success) => {
                    info!(command = %command, "remediation step completed");
                }
                Ok(CommandOutcome::Failed { code, stderr }) => {
                    error!(command = %command, ?code, %stderr, "remediation step failed");
                    return Err(RecoveryError::Remediation(format!(
                        "`{command}` exited with {code:?}"
                    )));
                }
                Err(e) => {
                    error!(command = %command, error = %e, "remediation step could not start");
                    return Err(RecoveryError::Remediation(format!("`{command}`: {e}")));
                }
            }
        }
        Ok(())
    }
}

/// Recording remediation for tests.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct MockRemediation {
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockRemediation {
    /// A remediation that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A remediation that always fails.
    #[must_use]
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.fail.store(true, Ordering::SeqCst);
        mock
    }

    /// Number of `restore` calls.
    #[must_use]
    pub fn restore_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemediationAction for MockRemediation {
    async fn restore(&self) -> RecoveryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RecoveryError::Remediation("mock failure".to_string()));
        }
        Ok(())
    }
}
