//! Property-based tests for threshold splitting and the share codec.
//!
//! ## Test Categories
//! 1. **Reconstruction correctness**: any k shares reconstruct the secret
//! 2. **Threshold secrecy**: k-1 shares never verify against the hash
//! 3. **Codec**: encoded shares decode to the same share, in any case

#![allow(clippy::cast_possible_truncation)]

use lazarus_crypto::{
    MASTER_SECRET_LEN, SecretHash, Share, reconstruct_secret, split_secret_with_rng,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

/// Valid (k, n) pairs with 2 <= k <= n, kept small enough for fast cases.
fn valid_k_n() -> impl Strategy<Value = (u8, u8)> {
    (2u8..=10).prop_flat_map(|k| (Just(k), k..=k.saturating_add(10)))
}

fn master_secret() -> impl Strategy<Value = [u8; MASTER_SECRET_LEN]> {
    prop::array::uniform32(any::<u8>())
}

fn rng_seed() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

fn pick(shares: &[Share], count: usize, seed: [u8; 32]) -> Vec<Share> {
    let mut rng = ChaCha20Rng::from_seed(seed);
    let mut picked: Vec<Share> = shares.to_vec();
    picked.shuffle(&mut rng);
    picked.truncate(count);
    picked
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any k shares, in any order, reconstruct the secret exactly.
    #[test]
    fn prop_any_k_shares_reconstruct(
        secret in master_secret(),
        (k, n) in valid_k_n(),
        split_seed in rng_seed(),
        pick_seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(split_seed);
        let shares = split_secret_with_rng(&mut rng, &secret, k, n).unwrap();
        prop_assert_eq!(shares.len(), usize::from(n));

        let subset = pick(&shares, usize::from(k), pick_seed);
        let recovered = reconstruct_secret(&subset).unwrap();
        prop_assert_eq!(recovered.as_bytes(), &secret[..]);
        prop_assert!(SecretHash::of(&secret).matches(&recovered));
    }

    /// More than k shares still reconstruct the secret.
    #[test]
    fn prop_extra_shares_still_reconstruct(
        secret in master_secret(),
        (k, n) in valid_k_n(),
        seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let shares = split_secret_with_rng(&mut rng, &secret, k, n).unwrap();
        let recovered = reconstruct_secret(&shares).unwrap();
        prop_assert_eq!(recovered.as_bytes(), &secret[..]);
    }

    /// k-1 shares never produce a value that verifies against the hash.
    #[test]
    fn prop_below_threshold_never_verifies(
        secret in master_secret(),
        (k, n) in valid_k_n(),
        split_seed in rng_seed(),
        pick_seed in rng_seed(),
    ) {
        let hash = SecretHash::of(&secret);
        let mut rng = ChaCha20Rng::from_seed(split_seed);
        let shares = split_secret_with_rng(&mut rng, &secret, k, n).unwrap();

        let subset = pick(&shares, usize::from(k - 1), pick_seed);
        let candidate = reconstruct_secret(&subset).unwrap();
        prop_assert!(!hash.matches(&candidate));
    }

    /// Encoded shares decode to the same share, regardless of hex case.
    #[test]
    fn prop_codec_preserves_shares(
        secret in master_secret(),
        seed in rng_seed(),
        upper in any::<bool>(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let shares = split_secret_with_rng(&mut rng, &secret, 3, 5).unwrap();
        for share in &shares {
            let text = share.encode();
            let text = if upper { text.to_uppercase() } else { text.to_string() };
            let decoded: Share = text.parse().unwrap();
            prop_assert_eq!(&decoded, share);
        }
    }
}

#[test]
fn reference_configuration_all_combinations() {
    let secret = [0x5Au8; MASTER_SECRET_LEN];
    let hash = SecretHash::of(&secret);
    let mut rng = ChaCha20Rng::from_seed([7; 32]);
    let shares = split_secret_with_rng(&mut rng, &secret, 3, 5).unwrap();

    let mut granted = 0;
    for a in 0..5 {
        for b in (a + 1)..5 {
            let pair = [shares[a].clone(), shares[b].clone()];
            assert!(!hash.matches(&reconstruct_secret(&pair).unwrap()));

            for c in (b + 1)..5 {
                let triple = [shares[a].clone(), shares[b].clone(), shares[c].clone()];
                assert!(hash.matches(&reconstruct_secret(&triple).unwrap()));
                granted += 1;
            }
        }
    }
    assert_eq!(granted, 10);
}
