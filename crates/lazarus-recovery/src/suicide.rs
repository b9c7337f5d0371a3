//! Lockout action: take the gate down, once.
//!
//! The first caller runs [`OverlayGate::disable`]; every concurrent or later
//! caller waits for that same run and gets its result. Nothing re-arms it.

use std::sync::Arc;

use lazarus_gate::OverlayGate;
use tokio::sync::OnceCell;
use tracing::{error, warn};

/// Result of the single gate shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The gate reported it is down.
    GateDisabled,
    /// The gate could not be disabled; the validator stays locked anyway.
    GateFailed,
}

/// At-most-once gate shutdown.
pub struct SuicideTrigger {
    gate: Arc<dyn OverlayGate>,
    fired: OnceCell<TriggerOutcome>,
}

impl SuicideTrigger {
    /// Create a trigger for `gate`.
    #[must_use]
    pub fn new(gate: Arc<dyn OverlayGate>) -> Self {
        Self {
            gate,
            fired: OnceCell::new(),
        }
    }

    /// Disable the gate if that has not happened yet.
    pub async fn trigger(&self) -> TriggerOutcome {
        *self
            .fired
            .get_or_init(|| async {
                warn!("attempt limit reached; disabling gate");
                match self.gate.disable().await {
                    Ok(()) => TriggerOutcome::GateDisabled,
                    Err(e) => {
                        error!(error = %e, "gate could not be disabled; validator remains locked");
                        TriggerOutcome::GateFailed
                    }
                }
            })
            .await
    }

    /// Outcome of the shutdown, if it has run.
    #[must_use]
    pub fn outcome(&self) -> Option<TriggerOutcome> {
        self.fired.get().copied()
    }
}

impl std::fmt::Debug for SuicideTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuicideTrigger")
            .field("outcome", &self.outcome())
            .finish_non_exhaustive()
    }
}
