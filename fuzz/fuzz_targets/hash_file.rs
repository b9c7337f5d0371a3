//! Verification Hash Fuzz Target
//!
//! Fuzzes hex digest parsing as read from the hash file.

#![no_main]

use lazarus_crypto::SecretHash;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(hash) = SecretHash::from_hex(text) {
        assert_eq!(SecretHash::from_hex(&hash.to_hex()).ok(), Some(hash));
    }
});
