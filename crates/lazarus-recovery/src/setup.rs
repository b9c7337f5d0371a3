//! One-time generation of recovery material.
//!
//! [`ShareGenerator::generate`] creates the master secret, splits it, installs
//! the gate record and persists the verification hash. Everything secret,
//! including the hex-encoded master secret, ends up in a [`SetupMaterial`],
//! which can be disclosed exactly once. The
//! administrator credential is also staged in an [`EphemeralFile`] so it can be
//! copied off the box; that file is shredded on every exit path.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use lazarus_crypto::{GateKeypair, MasterSecret, SecretHash, Share, split_secret};
use lazarus_gate::{GateConfig, install_authorization, torrc_stanza};
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::config::{RecoveryConfig, SetupConfig};
use crate::error::{RecoveryError, RecoveryResult};
use crate::store::SecretStore;

const SHRED_CHUNK: usize = 4096;

// ─────────────────────────────────────────────────────────────────────────────
// Ephemeral files
// ─────────────────────────────────────────────────────────────────────────────

/// A file holding secret material that is overwritten and unlinked when the
/// guard goes away, whether or not [`EphemeralFile::shred`] was called.
#[derive(Debug)]
pub struct EphemeralFile {
    path: PathBuf,
    shredded: bool,
}

impl EphemeralFile {
    /// Create `path` (mode 0600, must not exist) containing `contents`.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written. A partially
    /// written file is shredded before returning.
    pub fn create(path: impl Into<PathBuf>, contents: &[u8]) -> RecoveryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path)?;

        // From here on the guard owns the path.
        let guard = Self {
            path,
            shredded: false,
        };
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(guard)
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite with zeros, sync, and unlink.
    ///
    /// # Errors
    /// Returns an IO error if any step fails. The drop guard still retries.
    pub fn shred(mut self) -> RecoveryResult<()> {
        shred_path(&self.path)?;
        self.shredded = true;
        info!(path = %self.path.display(), "shredded staging file");
        Ok(())
    }
}

impl Drop for EphemeralFile {
    fn drop(&mut self) {
        if self.shredded {
            return;
        }
        match shred_path(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "shredded staging file"),
            Err(e) => error!(
                path = %self.path.display(),
                error = %e,
                "failed to shred staging file; remove it manually"
            ),
        }
    }
}

fn shred_path(path: &Path) -> io::Result<()> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let mut file = OpenOptions::new().write(true).open(path)?;
    let zeros = [0u8; SHRED_CHUNK];
    let mut remaining = len;
    while remaining > 0 {
        let n = usize::try_from(remaining).map_or(SHRED_CHUNK, |r| r.min(SHRED_CHUNK));
        file.write_all(&zeros[..n])?;
        remaining -= n as u64;
    }
    file.sync_all()?;
    drop(file);

    fs::remove_file(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Share generation
// ─────────────────────────────────────────────────────────────────────────────

/// Produces all recovery material in one shot.
#[derive(Debug, Clone)]
pub struct ShareGenerator {
    store: SecretStore,
    gate: GateConfig,
    setup: SetupConfig,
    listen: SocketAddr,
}

impl ShareGenerator {
    /// Default address the hidden service forwards to.
    pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(
        std::net::IpAddr::V4(Ipv4Addr::LOCALHOST),
        9999,
    );

    /// Create a generator writing the hash to `store`.
    #[must_use]
    pub const fn new(store: SecretStore, gate: GateConfig, setup: SetupConfig) -> Self {
        Self {
            store,
            gate,
            setup,
            listen: Self::DEFAULT_LISTEN,
        }
    }

    /// Address the validator will listen on, used in the `torrc` instructions.
    #[must_use]
    pub fn with_listen_addr(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    /// Generate `n` shares with threshold `k`.
    ///
    /// The hash is persisted last, so a failure in any earlier step leaves no
    /// hash behind and setup can simply be re-run.
    ///
    /// # Errors
    /// Returns [`RecoveryError::AlreadyInitialized`] if a hash exists,
    /// [`RecoveryError::Config`] for bad counts, or a crypto/IO error.
    pub fn generate(&self, n: u8, k: u8) -> RecoveryResult<SetupMaterial> {
        RecoveryConfig {
            total_shares: n,
            threshold: k,
            ..RecoveryConfig::default()
        }
        .validate()?;

        if self.store.exists() {
            warn!(path = %self.store.path().display(), "refusing to regenerate recovery material");
            return Err(RecoveryError::AlreadyInitialized {
                path: self.store.path().to_path_buf(),
            });
        }

        let (master_secret, shares, hash) = {
            let secret = MasterSecret::generate()?;
            let shares = split_secret(secret.as_bytes(), k, n)?;
            (secret.to_hex(), shares, SecretHash::of(secret.as_bytes()))
        };
        info!(total_shares = n, threshold = k, "split master secret");

        let keypair = GateKeypair::generate()?;
        let admin_credential = keypair.admin_credential();
        let staged = Zeroizing::new(format!("{}\n", admin_credential.as_str()));
        let staging = EphemeralFile::create(&self.setup.admin_key_staging, staged.as_bytes())?;
        let auth_record_path = install_authorization(&self.gate, &keypair)?;

        self.store.persist(&hash)?;

        Ok(SetupMaterial {
            master_secret,
            shares,
            threshold: k,
            admin_credential,
            auth_record_path,
            hash_path: self.store.path().to_path_buf(),
            torrc: torrc_stanza(&self.gate, self.listen),
            staging: Some(staging),
            disclosed: false,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-time disclosure
// ─────────────────────────────────────────────────────────────────────────────

/// Secret output of setup. Must be disclosed exactly once.
pub struct SetupMaterial {
    master_secret: Zeroizing<String>,
    shares: Vec<Share>,
    threshold: u8,
    admin_credential: Zeroizing<String>,
    auth_record_path: PathBuf,
    hash_path: PathBuf,
    torrc: String,
    staging: Option<EphemeralFile>,
    disclosed: bool,
}

impl SetupMaterial {
    /// Number of shares held.
    #[must_use]
    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    /// Where the administrator credential is staged.
    #[must_use]
    pub fn staging_path(&self) -> Option<&Path> {
        self.staging.as_ref().map(EphemeralFile::path)
    }

    /// Write the master secret, shares, credential and gate instructions to
    /// `out`, then destroy the in-memory copies.
    ///
    /// The returned guard keeps the staging file until the operator confirms.
    ///
    /// # Errors
    /// Returns [`RecoveryError::Disclosure`] if `out` fails. The material is
    /// gone either way.
    pub fn disclose<W: Write>(mut self, out: &mut W) -> RecoveryResult<DisclosedSetup> {
        self.write_to(out).map_err(|e| {
            RecoveryError::Disclosure(format!(
                "{e}; shares are lost, delete {} and run setup again",
                self.hash_path.display()
            ))
        })?;

        self.disclosed = true;
        info!(shares = self.shares.len(), "recovery material disclosed");
        Ok(DisclosedSetup {
            staging: self.staging.take(),
        })
    }

    fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(70);

        writeln!(out, "{rule}")?;
        writeln!(out, "MASTER SECRET")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "  {}", self.master_secret.as_str())?;
        writeln!(
            out,
            "Shown once. The shares below are enough to recover; do not store this next to them."
        )?;
        writeln!(out)?;

        writeln!(out, "{rule}")?;
        writeln!(out, "LAZARUS RECOVERY SHARES")?;
        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "Any {} of these {} shares restore access. They will never be shown again.",
            self.threshold,
            self.shares.len()
        )?;
        writeln!(out, "Store each one in a separate location, on paper.")?;
        writeln!(out)?;
        for share in &self.shares {
            let encoded = share.encode();
            writeln!(out, "SHARE #{}:", share.index())?;
            writeln!(out, "  {}", encoded.as_str())?;
        }
        writeln!(out)?;

        writeln!(out, "{rule}")?;
        writeln!(out, "ADMINISTRATOR CREDENTIAL")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "  {}", self.admin_credential.as_str())?;
        if let Some(staging) = &self.staging {
            writeln!(
                out,
                "Staged at {} until you confirm; copy it off this machine now.",
                staging.path().display()
            )?;
        }
        writeln!(
            out,
            "On the admin machine save it as <onion-address>:<credential> in ClientOnionAuthDir."
        )?;
        writeln!(out)?;

        writeln!(out, "{rule}")?;
        writeln!(out, "GATE")?;
        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "Client authorization installed at {}",
            self.auth_record_path.display()
        )?;
        writeln!(out, "Add to torrc and restart the overlay service:")?;
        for line in self.torrc.lines() {
            writeln!(out, "  {line}")?;
        }
        writeln!(out, "Verification hash: {}", self.hash_path.display())?;
        writeln!(out, "{rule}")?;

        out.flush()
    }
}

impl Drop for SetupMaterial {
    fn drop(&mut self) {
        if !self.disclosed {
            error!(
                hash = %self.hash_path.display(),
                "recovery material destroyed without being disclosed; shares are lost"
            );
        }
    }
}

impl std::fmt::Debug for SetupMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupMaterial")
            .field("master_secret", &"[redacted]")
            .field("shares", &self.shares.len())
            .field("threshold", &self.threshold)
            .field("admin_credential", &"[redacted]")
            .field("auth_record_path", &self.auth_record_path)
            .field("disclosed", &self.disclosed)
            .finish_non_exhaustive()
    }
}

/// Remaining state after disclosure: the staged administrator credential.
#[derive(Debug)]
pub struct DisclosedSetup {
    staging: Option<EphemeralFile>,
}

impl DisclosedSetup {
    /// Staging file, if one is still present.
    #[must_use]
    pub fn staging_path(&self) -> Option<&Path> {
        self.staging.as_ref().map(EphemeralFile::path)
    }

    /// Shred the staged credential. Dropping the guard does the same but
    /// can only log failures.
    ///
    /// # Errors
    /// Returns an IO error if shredding fails.
    pub fn finish(mut self) -> RecoveryResult<()> {
        match self.staging.take() {
            Some(staging) => staging.shred(),
            None => Ok(()),
        }
    }
}
