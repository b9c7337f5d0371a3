//! Lazarus break-glass recovery core.
//!
//! This crate implements both halves of the recovery lifecycle:
//!
//! - **Setup**: [`ShareGenerator`] creates the master secret, splits it into
//!   shares, persists only its hash via [`SecretStore`], installs the gate's
//!   client record and hands back a [`SetupMaterial`] that can be disclosed once.
//! - **Recovery**: [`RecoveryValidator`] checks submitted share sets against
//!   the stored hash, counts failures with [`AttemptTracker`], takes the gate
//!   down through [`SuicideTrigger`] at the limit, and runs the
//!   [`RemediationAction`] on success.
//!
//! # State machine
//!
//! ```text
//! ┌──────────┐  max_attempts failures  ┌──────────┐
//! │  Active  │────────────────────────▶│  Locked  │ (until process restart)
//! └──────────┘                         └──────────┘
//!      ▲  │ success: reset counter
//!      └──┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lazarus_gate::MockGate;
//! use lazarus_recovery::{MockRemediation, RecoveryConfig, RecoveryValidator, SecretStore};
//!
//! # async fn run() -> lazarus_recovery::RecoveryResult<()> {
//! let config = RecoveryConfig::default();
//! let hash = SecretStore::new(&config.hash_file).load()?;
//! let validator = RecoveryValidator::new(
//!     config,
//!     hash,
//!     Arc::new(MockGate::new()),
//!     Arc::new(MockRemediation::new()),
//! )?;
//!
//! let outcome = validator.attempt_recovery(&["1-...", "2-...", "3-..."]).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod remediation;
pub mod setup;
pub mod store;
pub mod submission;
pub mod suicide;
pub mod tracker;
pub mod validator;

pub use config::{RecoveryConfig, RemediationConfig, SetupConfig};
pub use error::{RecoveryError, RecoveryResult};
pub use remediation::{CommandRemediation, MockRemediation, RemediationAction};
pub use setup::{DisclosedSetup, EphemeralFile, SetupMaterial, ShareGenerator};
pub use store::{HASH_FILE_MODE, SecretStore};
pub use submission::{SubmissionError, decode_submission};
pub use suicide::{SuicideTrigger, TriggerOutcome};
pub use tracker::{AttemptStatus, AttemptTracker};
pub use validator::{RecoveryOutcome, RecoveryValidator, RemediationStatus, ValidatorState};
