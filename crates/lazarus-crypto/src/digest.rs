//! SHA-256 verification hash of the master secret.
//!
//! The hash is the only artifact that outlives setup. Candidate secrets are
//! checked against it with a fixed-time comparison.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{CryptoError, CryptoResult};

/// Verification hash size in bytes.
pub const SECRET_HASH_LEN: usize = 32;

/// SHA-256 digest of a master secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash([u8; SECRET_HASH_LEN]);

impl SecretHash {
    /// Hash arbitrary secret bytes.
    #[must_use]
    pub fn of(secret: &[u8]) -> Self {
        Self(Sha256::digest(secret).into())
    }

    /// Parse a 64-digit hex digest. Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidDigest`] for non-hex input or the wrong length.
    pub fn from_hex(text: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| CryptoError::InvalidDigest(e.to_string()))?;
        let arr: [u8; SECRET_HASH_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidDigest(format!(
                "expected {SECRET_HASH_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_HASH_LEN] {
        &self.0
    }

    /// Fixed-time comparison against another digest.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }

    /// Hash `candidate` and compare it to `self` in fixed time.
    #[must_use]
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.ct_eq(&Self::of(candidate))
    }
}

impl std::fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretHash").field(&self.to_hex()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sha256_vector() {
        // SHA-256("abc")
        let hash = SecretHash::of(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hex_parse_roundtrip_and_whitespace() {
        let hash = SecretHash::of(b"secret");
        let parsed = SecretHash::from_hex(&format!("{}\n", hash.to_hex())).unwrap();
        assert!(hash.ct_eq(&parsed));
        assert_eq!(hash, parsed);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            SecretHash::from_hex("not hex"),
            Err(CryptoError::InvalidDigest(_))
        ));
        assert!(matches!(
            SecretHash::from_hex("abcd"),
            Err(CryptoError::InvalidDigest(_))
        ));
    }

    #[test]
    fn matches_only_the_original() {
        let hash = SecretHash::of(&[7u8; 32]);
        assert!(hash.matches(&[7u8; 32]));

        let mut wrong = [7u8; 32];
        wrong[31] ^= 1;
        assert!(!hash.matches(&wrong));
        assert!(!hash.matches(&[]));
    }
}
