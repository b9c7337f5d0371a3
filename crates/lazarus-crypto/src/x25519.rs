//! X25519 identity for the overlay-network gate.
//!
//! The gate holds the public half as a client-authorization record; the
//! administrator keeps the private half off-box. Both are rendered in the
//! `descriptor:x25519:<BASE32>` form onion services expect.

use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};

/// X25519 key size in bytes (public and secret).
pub const X25519_KEY_SIZE: usize = 32;

const RECORD_PREFIX: &str = "descriptor:x25519:";

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Gate client-authorization keypair.
#[derive(ZeroizeOnDrop)]
pub struct GateKeypair {
    secret: StaticSecret,
    #[zeroize(skip)]
    public: PublicKey,
}

impl GateKeypair {
    /// Generate a keypair from the operating system RNG.
    ///
    /// # Errors
    /// Returns [`CryptoError::RandomnessUnavailable`] if the OS RNG fails.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = Zeroizing::new([0u8; X25519_KEY_SIZE]);
        rand::rngs::OsRng
            .try_fill_bytes(bytes.as_mut())
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        Ok(Self::from_secret_bytes(*bytes))
    }

    /// Build from raw secret bytes.
    #[must_use]
    pub fn from_secret_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Raw public key bytes.
    #[must_use]
    pub fn public_bytes(&self) -> [u8; X25519_KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Unpadded base32 of the public key.
    #[must_use]
    pub fn public_base32(&self) -> String {
        base32_encode(self.public.as_bytes())
    }

    /// Unpadded base32 of the secret key.
    #[must_use]
    pub fn secret_base32(&self) -> Zeroizing<String> {
        let mut raw = self.secret.to_bytes();
        let encoded = Zeroizing::new(base32_encode(&raw));
        raw.zeroize();
        encoded
    }

    /// Gate-side record: `descriptor:x25519:<BASE32(public)>`.
    #[must_use]
    pub fn authorization_record(&self) -> String {
        format!("{RECORD_PREFIX}{}", self.public_base32())
    }

    /// Administrator credential: `descriptor:x25519:<BASE32(secret)>`.
    #[must_use]
    pub fn admin_credential(&self) -> Zeroizing<String> {
        let secret = self.secret_base32();
        Zeroizing::new(format!("{RECORD_PREFIX}{}", secret.as_str()))
    }
}

impl std::fmt::Debug for GateKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateKeypair")
            .field("public", &self.public_base32())
            .finish_non_exhaustive()
    }
}

/// RFC 4648 base32 (uppercase alphabet, no padding).
#[must_use]
pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buffer: u16 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            let idx = usize::from((buffer >> bits) & 0x1F);
            out.push(char::from(BASE32_ALPHABET[idx]));
        }
        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        let idx = usize::from((buffer << (5 - bits)) & 0x1F);
        out.push(char::from(BASE32_ALPHABET[idx]));
    }

    out
}
