//! The 32-byte master secret.
//!
//! A `MasterSecret` only ever lives in memory for the duration of setup or a
//! successful reconstruction. It is zeroized on drop and never printable.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::shamir::ZeroizingSecret;

/// Master secret size in bytes.
pub const MASTER_SECRET_LEN: usize = 32;

/// The break-glass master secret.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret([u8; MASTER_SECRET_LEN]);

impl MasterSecret {
    /// Generate a fresh secret from the operating system RNG.
    ///
    /// # Errors
    /// Returns [`CryptoError::RandomnessUnavailable`] if the OS RNG fails.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; MASTER_SECRET_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Create from a byte slice of exactly [`MASTER_SECRET_LEN`] bytes.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidLength`] for any other length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; MASTER_SECRET_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidLength {
                expected: MASTER_SECRET_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Borrow the raw secret bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; MASTER_SECRET_LEN] {
        &self.0
    }

    /// Lowercase hex encoding, for the single setup-time disclosure.
    #[must_use]
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }
}

impl TryFrom<ZeroizingSecret> for MasterSecret {
    type Error = CryptoError;

    fn try_from(value: ZeroizingSecret) -> CryptoResult<Self> {
        Self::from_slice(value.as_bytes())
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret([redacted])")
    }
}
