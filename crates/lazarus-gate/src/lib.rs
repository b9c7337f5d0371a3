//! Lazarus network gate.
//!
//! The recovery endpoint is only reachable through an overlay-network hidden
//! service with client authorization. This crate owns everything Lazarus does
//! to that gate: writing the administrator's authorization record at setup and
//! taking the service down when the attempt limit is hit.
//!
//! # Overview
//!
//! - [`OverlayGate`] - Trait for disabling the gate (mockable for tests)
//! - [`CommandGate`] - Stops the overlay daemon via service-manager commands
//! - [`install_authorization`] - Writes `authorized_clients/<client>.auth`
//! - [`GateConfig`] - The `[gate]` configuration table

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod command;
mod config;
mod error;
mod identity;

pub use client::{CommandGate, MockGate, OverlayGate};
pub use command::{CommandOutcome, ShellCommand};
pub use config::GateConfig;
pub use error::{GateError, GateResult};
pub use identity::{
    AUTH_RECORD_EXTENSION, AUTHORIZED_CLIENTS_DIR, auth_record_path, install_authorization,
    torrc_stanza, validate_client_name,
};
