//! Verification-hash persistence.
//!
//! The hash file is the only thing Lazarus ever writes about the master
//! secret. It is created once with owner-only permissions and never
//! rewritten; the validator refuses to start from a file others can access.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lazarus_crypto::SecretHash;
use tracing::{debug, info};

use crate::error::{RecoveryError, RecoveryResult};

/// Owner-only file mode for the hash file.
pub const HASH_FILE_MODE: u32 = 0o600;

/// On-disk holder of the [`SecretHash`].
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    /// Create a store for `path`. Nothing is touched until `persist`/`load`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Hash file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a hash file (or anything else) already occupies the path.
    #[must_use]
    pub fn exists(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok()
    }

    /// Write `hash` as lowercase hex plus newline.
    ///
    /// Never overwrites: an existing file yields
    /// [`RecoveryError::AlreadyInitialized`].
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn persist(&self, hash: &SecretHash) -> RecoveryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(HASH_FILE_MODE);
        }

        let mut file = options.open(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                RecoveryError::AlreadyInitialized {
                    path: self.path.clone(),
                }
            } else {
                RecoveryError::Io(e)
            }
        })?;

        file.write_all(hash.to_hex().as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        info!(path = %self.path.display(), "persisted verification hash");
        Ok(())
    }

    /// Read and validate the stored hash.
    ///
    /// # Errors
    /// Returns [`RecoveryError::NotInitialized`] if the file is missing,
    /// [`RecoveryError::InsecurePermissions`] if group/other have any access,
    /// and [`RecoveryError::CorruptHash`] if the content is not a digest.
    pub fn load(&self) -> RecoveryResult<SecretHash> {
        let metadata = fs::metadata(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RecoveryError::NotInitialized {
                    path: self.path.clone(),
                }
            } else {
                RecoveryError::Io(e)
            }
        })?;
        check_owner_only(&self.path, &metadata)?;

        let content = fs::read_to_string(&self.path)?;
        let hash = SecretHash::from_hex(&content).map_err(|e| RecoveryError::CorruptHash {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %self.path.display(), "loaded verification hash");
        Ok(hash)
    }
}

#[cfg(unix)]
fn check_owner_only(path: &Path, metadata: &fs::Metadata) -> RecoveryResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(RecoveryError::InsecurePermissions {
            path: path.to_path_buf(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_owner_only(_path: &Path, _metadata: &fs::Metadata) -> RecoveryResult<()> {
    Ok(())
}
