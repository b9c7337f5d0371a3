//! Lazarus crypto primitives.
//!
//! This crate holds every piece of pure cryptography the break-glass recovery
//! path relies on. Nothing here touches the filesystem or the network.
//!
//! # Modules
//!
//! - [`shamir`] - k-of-n Shamir secret sharing over GF(2^8)
//! - [`share`] - textual `"<index>-<hex>"` share codec
//! - [`secret`] - the 32-byte master secret and its scoped lifetime
//! - [`digest`] - SHA-256 verification hash with fixed-time comparison
//! - [`x25519`] - X25519 keypair used for overlay-network client authorization
//!
//! # Example: split, encode, decode, reconstruct
//!
//! ```rust
//! use lazarus_crypto::{MasterSecret, SecretHash, Share, reconstruct_secret, split_secret};
//!
//! let secret = MasterSecret::generate().unwrap();
//! let hash = SecretHash::of(secret.as_bytes());
//!
//! let shares = split_secret(secret.as_bytes(), 3, 5).unwrap();
//! let texts: Vec<_> = shares.iter().map(Share::encode).collect();
//!
//! let decoded: Vec<Share> = texts[1..4].iter().map(|t| t.parse().unwrap()).collect();
//! let recovered = reconstruct_secret(&decoded).unwrap();
//!
//! assert!(hash.matches(&recovered));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod digest;
pub mod error;
pub mod secret;
pub mod shamir;
pub mod share;
pub mod x25519;

pub use digest::{SECRET_HASH_LEN, SecretHash};
pub use error::{CryptoError, CryptoResult};
pub use secret::{MASTER_SECRET_LEN, MasterSecret};
pub use shamir::{
    ShamirError, ShamirResult, Share, ZeroizingSecret, reconstruct_secret, split_secret,
    split_secret_with_rng,
};
pub use share::ShareDecodeError;
pub use x25519::{GateKeypair, X25519_KEY_SIZE, base32_encode};
