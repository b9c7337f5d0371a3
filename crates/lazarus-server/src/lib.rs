//! Lazarus recovery endpoint.
//!
//! The only network-reachable part of Lazarus. It is meant to listen on
//! loopback behind an overlay-network hidden service with client
//! authorization, and does nothing but hand share sets to a
//! [`RecoveryValidator`](lazarus_recovery::RecoveryValidator).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lazarus_gate::MockGate;
//! use lazarus_recovery::{MockRemediation, RecoveryConfig, RecoveryValidator, SecretStore};
//! use lazarus_server::{AppState, ServerConfig, bind, serve};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let recovery = RecoveryConfig::default();
//! let hash = SecretStore::new(&recovery.hash_file).load()?;
//! let validator = RecoveryValidator::new(
//!     recovery,
//!     hash,
//!     Arc::new(MockGate::new()),
//!     Arc::new(MockRemediation::new()),
//! )?;
//!
//! let config = ServerConfig::default();
//! let listener = bind(config.listen).await?;
//! serve(listener, AppState::new(Arc::new(validator)), &config, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;

pub use config::{LoggingConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use http::{AppState, StatusBody, bind, respond, router, serve};
pub use telemetry::init_logging;
