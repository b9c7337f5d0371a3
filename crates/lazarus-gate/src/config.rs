//! Gate configuration (`[gate]` table).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::command::ShellCommand;

/// Overlay-network gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Hidden-service directory the overlay daemon reads.
    #[serde(default = "default_hidden_service_dir")]
    pub hidden_service_dir: PathBuf,

    /// Name of the administrator's client-authorization record.
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Virtual port the hidden service exposes.
    #[serde(default = "default_virtual_port")]
    pub virtual_port: u16,

    /// Commands tried in order to take the gate down; the first success wins.
    #[serde(default = "default_stop_commands")]
    pub stop_commands: Vec<ShellCommand>,
}

fn default_hidden_service_dir() -> PathBuf {
    PathBuf::from("/var/lib/tor/lazarus")
}

fn default_client_name() -> String {
    "admin".to_string()
}

const fn default_virtual_port() -> u16 {
    80
}

fn default_stop_commands() -> Vec<ShellCommand> {
    vec![
        ShellCommand::new("systemctl", ["stop", "tor"]),
        ShellCommand::new("service", ["tor", "stop"]),
    ]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            hidden_service_dir: default_hidden_service_dir(),
            client_name: default_client_name(),
            virtual_port: default_virtual_port(),
            stop_commands: default_stop_commands(),
        }
    }
}
