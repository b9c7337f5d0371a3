//! Shamir's Secret Sharing over GF(2^8).
//!
//! Each byte of the secret is the constant term of its own random polynomial
//! of degree `k - 1`. A share is the vector of evaluations of all of those
//! polynomials at one non-zero x-coordinate (the share index).
//!
//! **Security properties:**
//! - Information-theoretic security: k-1 shares reveal nothing about the secret
//! - Field arithmetic is branch-free on secret data
//! - Share data, polynomial coefficients and reconstructed secrets are zeroized on drop
//!
//! # Example
//!
//! ```rust
//! use lazarus_crypto::shamir::{split_secret, reconstruct_secret};
//!
//! let secret = [7u8; 32];
//! let shares = split_secret(&secret, 3, 5).unwrap();
//!
//! let recovered = reconstruct_secret(&shares[2..5]).unwrap();
//! assert_eq!(recovered.as_bytes(), &secret);
//! ```

use rand::{CryptoRng, RngCore};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Errors that can occur during secret sharing operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShamirError {
    /// Threshold k must be at least 1.
    #[error("threshold must be at least 1")]
    ThresholdTooSmall,

    /// Threshold k cannot exceed total shares n.
    #[error("threshold ({threshold}) cannot exceed total shares ({total})")]
    ThresholdExceedsTotal {
        /// The requested threshold.
        threshold: u8,
        /// The total number of shares.
        total: u8,
    },

    /// Secret is empty.
    #[error("secret cannot be empty")]
    EmptySecret,

    /// No shares were supplied for reconstruction.
    #[error("no shares supplied")]
    NoShares,

    /// Duplicate share indices detected.
    #[error("duplicate share index: {0}")]
    DuplicateIndex(u8),

    /// Share index 0 is reserved (corresponds to the secret).
    #[error("share index 0 is reserved")]
    ReservedIndex,

    /// Share lengths do not match.
    #[error("share lengths must match")]
    MismatchedLengths,

    /// The RNG could not supply polynomial coefficients.
    #[error("randomness unavailable")]
    RandomnessUnavailable,
}

/// Result type for Shamir operations.
pub type ShamirResult<T> = Result<T, ShamirError>;

/// A single share: one point per secret byte, all at the same x-coordinate.
///
/// The share reveals nothing about the secret without k-1 other shares.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Share index (x-coordinate), 1-255.
    #[zeroize(skip)]
    index: u8,

    /// Share data (y-values).
    data: Vec<u8>,
}

impl Share {
    /// Create a share from an index and its y-values.
    ///
    /// # Errors
    /// Returns [`ShamirError::ReservedIndex`] if `index` is 0.
    pub fn new(index: u8, data: Vec<u8>) -> ShamirResult<Self> {
        if index == 0 {
            return Err(ShamirError::ReservedIndex);
        }
        Ok(Self { index, data })
    }

    /// Get the share index (x-coordinate).
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Get the share data (y-values).
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the length of the share data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the share data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .field("len", &self.data.len())
            .field("data", &"[redacted]")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GF(2^8) Arithmetic
// ─────────────────────────────────────────────────────────────────────────────

/// GF(2^8) element.
///
/// Uses the AES irreducible polynomial: x^8 + x^4 + x^3 + x + 1 (0x11B).
#[derive(Clone, Copy, Default, Zeroize)]
struct Gf256(u8);

impl Gf256 {
    const MODULUS: u16 = 0x11B;

    #[inline]
    const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    const fn value(self) -> u8 {
        self.0
    }

    /// Addition is XOR.
    #[inline]
    const fn add(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// Subtraction is the same as addition.
    #[inline]
    const fn sub(self, other: Self) -> Self {
        self.add(other)
    }

    /// Russian peasant multiplication, always 8 rounds, masks instead of branches.
    #[inline]
    fn mul(self, other: Self) -> Self {
        let mut a = u16::from(self.0);
        let mut b = u16::from(other.0);
        let mut result: u16 = 0;

        for _ in 0..8 {
            let mask = 0u16.wrapping_sub(b & 1);
            result ^= a & mask;

            let reduce_mask = 0u16.wrapping_sub((a >> 7) & 1);
            a = (a << 1) ^ (Self::MODULUS & reduce_mask);

            b >>= 1;
        }

        #[allow(clippy::cast_possible_truncation)]
        Self(result as u8)
    }

    /// Multiplicative inverse as a^254 (Fermat). Maps 0 to 0.
    #[inline]
    fn inv(self) -> Self {
        let a2 = self.mul(self);
        let a4 = a2.mul(a2);
        let a8 = a4.mul(a4);
        let a16 = a8.mul(a8);
        let a32 = a16.mul(a16);
        let a64 = a32.mul(a32);
        let a128 = a64.mul(a64);

        // 254 = 128 + 64 + 32 + 16 + 8 + 4 + 2
        a128.mul(a64).mul(a32).mul(a16).mul(a8).mul(a4).mul(a2)
    }

    #[inline]
    fn div(self, other: Self) -> Self {
        self.mul(other.inv())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polynomial Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluate `a₀ + a₁·x + ... + aₖ₋₁·x^(k-1)` with Horner's method.
fn poly_eval(coefficients: &[Gf256], x: Gf256) -> Gf256 {
    let mut result = Gf256::new(0);
    for coeff in coefficients.iter().rev() {
        result = result.mul(x).add(*coeff);
    }
    result
}

/// Lagrange interpolation at x = 0 through the points `(xs[i], ys[i])`.
///
/// `L_i(0) = ∏_{j≠i} x_j / (x_i - x_j)`; subtraction is XOR in this field.
fn lagrange_interpolate_at_zero(xs: &[Gf256], ys: &[Gf256]) -> Gf256 {
    let mut result = Gf256::new(0);

    for (i, (&x_i, &y_i)) in xs.iter().zip(ys).enumerate() {
        let mut basis = Gf256::new(1);
        for (j, &x_j) in xs.iter().enumerate() {
            if i != j {
                basis = basis.mul(x_j.div(x_i.sub(x_j)));
            }
        }
        result = result.add(y_i.mul(basis));
    }

    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Split a secret into `n` shares, any `k` of which reconstruct it.
///
/// Shares are indexed `1..=n`. Uses the operating system RNG.
///
/// # Errors
/// Returns error if parameters are invalid.
pub fn split_secret(secret: &[u8], k: u8, n: u8) -> ShamirResult<Vec<Share>> {
    split_secret_with_rng(&mut rand::rngs::OsRng, secret, k, n)
}

/// Split a secret using a provided RNG (for testing/determinism).
///
/// # Errors
///
/// Returns error if:
/// - `k` is 0
/// - `k > n`
/// - `secret` is empty
/// - `rng` fails to produce coefficients
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: &[u8],
    k: u8,
    n: u8,
) -> ShamirResult<Vec<Share>> {
    if k == 0 {
        return Err(ShamirError::ThresholdTooSmall);
    }
    if k > n {
        return Err(ShamirError::ThresholdExceedsTotal {
            threshold: k,
            total: n,
        });
    }
    if secret.is_empty() {
        return Err(ShamirError::EmptySecret);
    }

    let degree = usize::from(k) - 1;

    let mut shares: Vec<Share> = (1..=n)
        .map(|index| Share {
            index,
            data: Vec::with_capacity(secret.len()),
        })
        .collect();

    let mut random = Zeroizing::new(vec![0u8; degree]);
    let mut poly: Zeroizing<Vec<Gf256>> = Zeroizing::new(Vec::with_capacity(degree + 1));

    for &secret_byte in secret {
        rng.try_fill_bytes(&mut random)
            .map_err(|_| ShamirError::RandomnessUnavailable)?;

        poly.clear();
        poly.push(Gf256::new(secret_byte));
        poly.extend(random.iter().copied().map(Gf256::new));

        for share in &mut shares {
            let y = poly_eval(&poly, Gf256::new(share.index));
            share.data.push(y.value());
        }
    }

    Ok(shares)
}

/// Reconstruct a secret from the given shares by interpolating every byte
/// position at x = 0.
///
/// All supplied shares are used. With fewer than the original threshold the
/// result is a uniformly unrelated value, not an error: the scheme cannot tell.
///
/// # Errors
/// Returns error if the shares are empty, contain a reserved or duplicate
/// index, or have mismatched lengths.
pub fn reconstruct_secret(shares: &[Share]) -> ShamirResult<ZeroizingSecret> {
    let first = shares.first().ok_or(ShamirError::NoShares)?;

    let mut seen = [false; 256];
    for share in shares {
        if share.index == 0 {
            return Err(ShamirError::ReservedIndex);
        }
        if seen[usize::from(share.index)] {
            return Err(ShamirError::DuplicateIndex(share.index));
        }
        seen[usize::from(share.index)] = true;
    }

    let secret_len = first.data.len();
    if secret_len == 0 {
        return Err(ShamirError::EmptySecret);
    }
    if shares.iter().any(|s| s.data.len() != secret_len) {
        return Err(ShamirError::MismatchedLengths);
    }

    let xs: Vec<Gf256> = shares.iter().map(|s| Gf256::new(s.index)).collect();
    let mut ys: Zeroizing<Vec<Gf256>> = Zeroizing::new(Vec::with_capacity(shares.len()));
    let mut secret = Vec::with_capacity(secret_len);

    for byte_idx in 0..secret_len {
        ys.clear();
        ys.extend(shares.iter().map(|s| Gf256::new(s.data[byte_idx])));
        secret.push(lagrange_interpolate_at_zero(&xs, &ys).value());
    }

    Ok(ZeroizingSecret(secret))
}

/// Wrapper for a reconstructed secret that zeroizes on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ZeroizingSecret(Vec<u8>);

impl ZeroizingSecret {
    /// Access the secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length of the secret.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for ZeroizingSecret {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for ZeroizingSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroizingSecret")
            .field("len", &self.0.len())
            .field("data", &"[redacted]")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn deterministic_rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([0x42; 32])
    }

    fn share(index: u8, data: Vec<u8>) -> Share {
        Share::new(index, data).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GF(2^8)
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn gf256_add_is_xor() {
        let a = Gf256::new(0b1010_1010);
        let b = Gf256::new(0b1100_1100);
        assert_eq!(a.add(b).value(), 0b1010_1010 ^ 0b1100_1100);
        assert_eq!(a.add(a).value(), 0);
    }

    #[test]
    fn gf256_mul_identity_and_zero() {
        let a = Gf256::new(42);
        assert_eq!(a.mul(Gf256::new(1)).value(), 42);
        assert_eq!(a.mul(Gf256::new(0)).value(), 0);
    }

    #[test]
    fn gf256_mul_known_value() {
        // FIPS-197 section 4.2: {57} • {83} = {c1}
        assert_eq!(Gf256::new(0x57).mul(Gf256::new(0x83)).value(), 0xC1);
    }

    #[test]
    fn gf256_mul_commutative() {
        for a in [0x01u8, 0x53, 0xCA, 0xFF] {
            for b in [0x02u8, 0x11, 0x80, 0xFE] {
                assert_eq!(
                    Gf256::new(a).mul(Gf256::new(b)).value(),
                    Gf256::new(b).mul(Gf256::new(a)).value()
                );
            }
        }
    }

    #[test]
    fn gf256_inv_property() {
        for i in 1..=255u8 {
            let a = Gf256::new(i);
            assert_eq!(a.mul(a.inv()).value(), 1, "inverse failed for {i}");
        }
    }

    #[test]
    fn gf256_div_reverses_mul() {
        let a = Gf256::new(42);
        let b = Gf256::new(17);
        assert_eq!(a.mul(b).div(b).value(), 42);
    }

    #[test]
    fn poly_eval_at_zero_returns_constant() {
        let coeffs = [Gf256::new(7), Gf256::new(3), Gf256::new(5)];
        assert_eq!(poly_eval(&coeffs, Gf256::new(0)).value(), 7);
    }

    #[test]
    fn interpolation_recovers_line() {
        // f(x) = 9 + 4x, sampled at 1 and 2.
        let f = |x: u8| Gf256::new(9).add(Gf256::new(4).mul(Gf256::new(x)));
        let xs = [Gf256::new(1), Gf256::new(2)];
        let ys = [f(1), f(2)];
        assert_eq!(lagrange_interpolate_at_zero(&xs, &ys).value(), 9);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Split / reconstruct
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn split_assigns_indices_one_to_n() {
        let shares = split_secret(&[1, 2, 3], 3, 5).unwrap();
        let indices: Vec<u8> = shares.iter().map(Share::index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(shares.iter().all(|s| s.len() == 3));
    }

    #[test]
    fn every_three_of_five_reconstructs() {
        let mut rng = deterministic_rng();
        let secret = [0xA5u8; 32];
        let shares = split_secret_with_rng(&mut rng, &secret, 3, 5).unwrap();

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    let recovered = reconstruct_secret(&subset).unwrap();
                    assert_eq!(recovered.as_bytes(), &secret, "failed for {a},{b},{c}");
                }
            }
        }
    }

    #[test]
    fn two_of_five_never_reconstructs() {
        let mut rng = deterministic_rng();
        let secret = *b"two shares must never be enough!";
        let shares = split_secret_with_rng(&mut rng, &secret, 3, 5).unwrap();

        for a in 0..5 {
            for b in (a + 1)..5 {
                let subset = [shares[a].clone(), shares[b].clone()];
                let recovered = reconstruct_secret(&subset).unwrap();
                assert_ne!(recovered.as_bytes(), &secret, "leaked with {a},{b}");
            }
        }
    }

    #[test]
    fn split_reconstruct_n_of_n() {
        let secret = b"all required";
        let shares = split_secret(secret, 5, 5).unwrap();
        let recovered = reconstruct_secret(&shares).unwrap();
        assert_eq!(&recovered[..], secret);
    }

    #[test]
    fn same_rng_produces_same_shares() {
        let secret = b"deterministic";
        let shares1 = split_secret_with_rng(&mut deterministic_rng(), secret, 3, 5).unwrap();
        let shares2 = split_secret_with_rng(&mut deterministic_rng(), secret, 3, 5).unwrap();
        assert_eq!(shares1, shares2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Error cases
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn split_rejects_bad_parameters() {
        assert_eq!(
            split_secret(b"x", 0, 5).unwrap_err(),
            ShamirError::ThresholdTooSmall
        );
        assert_eq!(
            split_secret(b"x", 6, 5).unwrap_err(),
            ShamirError::ThresholdExceedsTotal {
                threshold: 6,
                total: 5
            }
        );
        assert_eq!(split_secret(b"", 3, 5).unwrap_err(), ShamirError::EmptySecret);
    }

    struct ExhaustedRng;

    impl RngCore for ExhaustedRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("fill_bytes must not be used for coefficients");
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source exhausted"))
        }
    }

    impl CryptoRng for ExhaustedRng {}

    #[test]
    fn split_reports_rng_failure() {
        assert_eq!(
            split_secret_with_rng(&mut ExhaustedRng, &[1u8; 32], 3, 5).unwrap_err(),
            ShamirError::RandomnessUnavailable
        );
    }

    #[test]
    fn reconstruct_rejects_duplicate_index() {
        let shares = [share(1, vec![1, 2, 3]), share(1, vec![4, 5, 6])];
        assert_eq!(
            reconstruct_secret(&shares).unwrap_err(),
            ShamirError::DuplicateIndex(1)
        );
    }

    #[test]
    fn reconstruct_rejects_mismatched_lengths() {
        let shares = [share(1, vec![1, 2, 3]), share(2, vec![4, 5])];
        assert_eq!(
            reconstruct_secret(&shares).unwrap_err(),
            ShamirError::MismatchedLengths
        );
    }

    #[test]
    fn reconstruct_rejects_empty_input() {
        assert_eq!(reconstruct_secret(&[]).unwrap_err(), ShamirError::NoShares);
        assert_eq!(
            reconstruct_secret(&[share(1, vec![])]).unwrap_err(),
            ShamirError::EmptySecret
        );
    }

    #[test]
    fn share_new_rejects_index_zero() {
        assert_eq!(
            Share::new(0, vec![1]).unwrap_err(),
            ShamirError::ReservedIndex
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let debug = format!("{:?}", share(1, vec![0xDE, 0xAD, 0xBE, 0xEF]));
        assert!(debug.contains("[redacted]"));
        assert!(!debug.to_lowercase().contains("dead"));

        let secret = ZeroizingSecret(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(format!("{secret:?}").contains("[redacted]"));
    }
}
