//! Share Submission Fuzz Target
//!
//! Fuzzes share text decoding and submission checks.
//! Goal: no panics, and every accepted share re-encodes to itself.

#![no_main]

use lazarus_crypto::Share;
use lazarus_recovery::decode_submission;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(share) = text.parse::<Share>() {
        let encoded = share.encode();
        let again: Share = encoded.parse().expect("re-encoded share must decode");
        assert_eq!(again.index(), share.index());
        assert_eq!(again.data(), share.data());
    }

    let lines: Vec<&str> = text.lines().collect();
    if let Ok(shares) = decode_submission(&lines, 3) {
        assert_eq!(shares.len(), 3);
        assert!(shares.windows(2).all(|w| w[0].index() < w[1].index()));
    }
});
