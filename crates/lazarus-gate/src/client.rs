//! Gate control abstraction.
//!
//! The validator only needs one capability from the gate: take it down so the
//! service becomes unreachable. [`CommandGate`] does that by stopping the
//! overlay daemon; [`MockGate`] records calls for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::command::{CommandOutcome, ShellCommand};
use crate::config::GateConfig;
use crate::error::{GateError, GateResult};

/// Something that controls reachability of the recovery endpoint.
#[async_trait]
pub trait OverlayGate: Send + Sync {
    /// Make the endpoint unreachable.
    async fn disable(&self) -> GateResult<()>;
}

/// Gate backed by service-manager commands.
#[derive(Debug, Clone)]
pub struct CommandGate {
    commands: Vec<ShellCommand>,
}

impl CommandGate {
    /// Create a gate that tries `commands` in order.
    #[must_use]
    pub const fn new(commands: Vec<ShellCommand>) -> Self {
        Self { commands }
    }

    /// Create a gate from configuration.
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.stop_commands.clone())
    }

    /// Configured commands.
    #[must_use]
    pub fn commands(&self) -> &[ShellCommand] {
        &self.commands
    }
}

#[async_trait]
impl OverlayGate for CommandGate {
    async fn disable(&self) -> GateResult<()> {
        if self.commands.is_empty() {
            error!("no gate stop commands configured");
            return Err(GateError::NoCommands);
        }

        for command in &self.commands {
            match command.run().await {
                Ok(CommandOutcome::Success) => {
                    info!(command = %command, "gate disabled");
                    return Ok(());
                }
                Ok(CommandOutcome::Failed { code, stderr }) => {
                    warn!(command = %command, ?code, %stderr, "gate stop command failed");
                }
                Err(e) => {
                    warn!(command = %command, error = %e, "gate stop command could not start");
                }
            }
        }

        error!(
            attempted = self.commands.len(),
            "every gate stop command failed; stop the overlay service manually"
        );
        Err(GateError::AllCommandsFailed {
            attempted: self.commands.len(),
        })
    }
}

/// Mock gate for testing.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct MockGate {
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockGate {
    /// Create a mock gate whose `disable` succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock gate whose `disable` always fails.
    #[must_use]
    pub fn failing() -> Self {
        let gate = Self::default();
        gate.fail.store(true, Ordering::SeqCst);
        gate
    }

    /// Number of times `disable` has been called.
    #[must_use]
    pub fn disable_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OverlayGate for MockGate {
    async fn disable(&self) -> GateResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GateError::AllCommandsFailed { attempted: 1 });
        }
        Ok(())
    }
}
