//! The recovery request handler.
//!
//! ```text
//! submission ─▶ locked? ──yes──────────────────────────────▶ Locked
//!                 │no
//!                 ▼
//!             decode ──malformed──▶ (count if configured) ──▶ Rejected
//!                 │
//!                 ▼
//!           reconstruct ─▶ hash matches? ──no──▶ increment ──▶ Rejected | Locked
//!                                │yes
//!                                ▼
//!                     reset (fails if locked) ──▶ remediation ──▶ Granted
//! ```
//!
//! Every call is padded to the configured minimum duration, measured from
//! entry, whatever the outcome.

use std::sync::Arc;

use lazarus_crypto::{MasterSecret, SecretHash, reconstruct_secret};
use lazarus_gate::OverlayGate;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use crate::config::RecoveryConfig;
use crate::error::RecoveryResult;
use crate::remediation::RemediationAction;
use crate::submission::decode_submission;
use crate::suicide::{SuicideTrigger, TriggerOutcome};
use crate::tracker::AttemptTracker;

/// Validator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    /// Accepting submissions.
    Active,
    /// Attempt limit reached; terminal until restart.
    Locked,
}

/// How the post-recovery remediation went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStatus {
    /// Remediation completed.
    Completed,
    /// Remediation failed; the operator must intervene locally.
    Failed,
}

/// Result of one recovery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// Shares reconstructed the master secret.
    Granted {
        /// Remediation result.
        remediation: RemediationStatus,
    },
    /// Submission was malformed or wrong.
    Rejected {
        /// Attempts left before lockout.
        remaining_attempts: u32,
    },
    /// The validator is locked.
    Locked,
}

/// Request-handling core.
pub struct RecoveryValidator {
    config: RecoveryConfig,
    hash: SecretHash,
    tracker: AttemptTracker,
    trigger: SuicideTrigger,
    remediation: Arc<dyn RemediationAction>,
}

impl RecoveryValidator {
    /// Create an `Active` validator.
    ///
    /// # Errors
    /// Returns [`crate::RecoveryError::Config`] if `config` is invalid.
    pub fn new(
        config: RecoveryConfig,
        hash: SecretHash,
        gate: Arc<dyn OverlayGate>,
        remediation: Arc<dyn RemediationAction>,
    ) -> RecoveryResult<Self> {
        config.validate()?;
        info!(
            threshold = config.threshold,
            max_attempts = config.max_attempts,
            min_response_ms = config.min_response_ms,
            "recovery validator active"
        );
        Ok(Self {
            tracker: AttemptTracker::new(config.max_attempts),
            trigger: SuicideTrigger::new(gate),
            config,
            hash,
            remediation,
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ValidatorState {
        if self.tracker.is_locked() {
            ValidatorState::Locked
        } else {
            ValidatorState::Active
        }
    }

    /// Policy in force.
    #[must_use]
    pub const fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Consecutive failed attempts so far.
    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.tracker.failed_attempts()
    }

    /// Gate shutdown outcome, if lockout has fired.
    #[must_use]
    pub fn trigger_outcome(&self) -> Option<TriggerOutcome> {
        self.trigger.outcome()
    }

    /// Evaluate one submitted share set.
    ///
    /// Always runs to completion and never returns before the minimum
    /// response time has elapsed.
    pub async fn attempt_recovery<S: AsRef<str>>(&self, submission: &[S]) -> RecoveryOutcome {
        let deadline = Instant::now() + self.config.min_response();
        let outcome = self.evaluate(submission).await;
        sleep_until(deadline).await;
        outcome
    }

    async fn evaluate<S: AsRef<str>>(&self, submission: &[S]) -> RecoveryOutcome {
        if self.tracker.is_locked() {
            debug!("submission refused: validator locked");
            return RecoveryOutcome::Locked;
        }

        let shares = match decode_submission(submission, self.config.threshold) {
            Ok(shares) => shares,
            Err(reason) => {
                warn!(%reason, "malformed recovery submission");
                return self.malformed().await;
            }
        };

        let matched = match reconstruct_secret(&shares) {
            Ok(candidate) => MasterSecret::try_from(candidate)
                .is_ok_and(|secret| self.hash.matches(secret.as_bytes())),
            Err(e) => {
                warn!(error = %e, "share set could not be interpolated");
                return self.malformed().await;
            }
        };
        drop(shares);

        if matched {
            self.grant().await
        } else {
            self.record_failure().await
        }
    }

    async fn malformed(&self) -> RecoveryOutcome {
        if self.config.count_malformed_attempts {
            self.record_failure().await
        } else {
            RecoveryOutcome::Rejected {
                remaining_attempts: self.tracker.remaining(),
            }
        }
    }

    async fn grant(&self) -> RecoveryOutcome {
        if !self.tracker.reset() {
            warn!("valid shares arrived after lockout; refusing");
            self.trigger.trigger().await;
            return RecoveryOutcome::Locked;
        }

        info!("recovery granted; running remediation");
        match self.remediation.restore().await {
            Ok(()) => {
                info!("remediation completed");
                RecoveryOutcome::Granted {
                    remediation: RemediationStatus::Completed,
                }
            }
            Err(e) => {
                error!(error = %e, "remediation failed after successful recovery; intervene locally");
                RecoveryOutcome::Granted {
                    remediation: RemediationStatus::Failed,
                }
            }
        }
    }

    async fn record_failure(&self) -> RecoveryOutcome {
        let status = self.tracker.increment_and_check();
        let max_attempts = self.tracker.max_attempts();

        if status.locked {
            if status.newly_locked {
                error!(attempts = status.count, max_attempts, "attempt limit reached; locking");
            }
            self.trigger.trigger().await;
            return RecoveryOutcome::Locked;
        }

        warn!(attempts = status.count, max_attempts, "recovery attempt rejected");
        RecoveryOutcome::Rejected {
            remaining_attempts: max_attempts.saturating_sub(status.count),
        }
    }
}

impl std::fmt::Debug for RecoveryValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryValidator")
            .field("state", &self.state())
            .field("tracker", &self.tracker)
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}
