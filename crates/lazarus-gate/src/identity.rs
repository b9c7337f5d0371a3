//! Client-authorization material for the hidden service.
//!
//! The gate learns who may connect from one record per client under
//! `<hidden_service_dir>/authorized_clients/<client>.auth`. Only key holders can
//! even resolve the service descriptor.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use lazarus_crypto::GateKeypair;
use tracing::info;

use crate::config::GateConfig;
use crate::error::{GateError, GateResult};

/// Directory under the hidden-service dir that holds client records.
pub const AUTHORIZED_CLIENTS_DIR: &str = "authorized_clients";

/// File extension of client-authorization records.
pub const AUTH_RECORD_EXTENSION: &str = "auth";

/// Check that a client name is safe to use as a file stem.
///
/// # Errors
/// Returns [`GateError::InvalidClientName`] for empty names or names with
/// characters outside `[A-Za-z0-9_-]`.
pub fn validate_client_name(name: &str) -> GateResult<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(GateError::InvalidClientName(name.to_string()))
    }
}

/// Path of the authorization record for `client_name`.
///
/// # Errors
/// Returns [`GateError::InvalidClientName`] if the name is unusable.
pub fn auth_record_path(hidden_service_dir: &Path, client_name: &str) -> GateResult<PathBuf> {
    validate_client_name(client_name)?;
    Ok(hidden_service_dir
        .join(AUTHORIZED_CLIENTS_DIR)
        .join(format!("{client_name}.{AUTH_RECORD_EXTENSION}")))
}

/// Install the gate-side authorization record for `keypair`.
///
/// Creates `authorized_clients/` (mode 0700) if needed and writes the record
/// with mode 0600, replacing any previous record for the same client.
///
/// # Errors
/// Returns an error if the client name is invalid or the record cannot be written.
pub fn install_authorization(config: &GateConfig, keypair: &GateKeypair) -> GateResult<PathBuf> {
    let path = auth_record_path(&config.hidden_service_dir, &config.client_name)?;
    let dir = config.hidden_service_dir.join(AUTHORIZED_CLIENTS_DIR);
    create_private_dir(&dir)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&path)?;
    file.write_all(keypair.authorization_record().as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    restrict_permissions(&path, 0o600)?;

    info!(path = %path.display(), "installed gate client authorization");
    Ok(path)
}

/// The `torrc` lines an operator must add for the hidden service.
#[must_use]
pub fn torrc_stanza(config: &GateConfig, listen: SocketAddr) -> String {
    format!(
        "HiddenServiceDir {}\nHiddenServicePort {} {}\nHiddenServiceVersion 3\n",
        config.hidden_service_dir.display(),
        config.virtual_port,
        listen
    )
}

fn create_private_dir(dir: &Path) -> GateResult<()> {
    fs::create_dir_all(dir)?;
    restrict_permissions(dir, 0o700)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> GateResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> GateResult<()> {
    Ok(())
}
