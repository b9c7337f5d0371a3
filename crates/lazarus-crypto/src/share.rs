//! Textual share codec: `"<index>-<hex-value>"`.
//!
//! The index is a decimal integer in `1..=255`; the value is exactly
//! [`MASTER_SECRET_LEN`] bytes of hex. Encoding always emits lowercase hex and
//! returns a zeroizing string, since the text is as sensitive as the share.

use std::str::FromStr;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::secret::MASTER_SECRET_LEN;
use crate::shamir::Share;

/// Reasons a share string could not be decoded.
///
/// Variants never carry the offending text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShareDecodeError {
    /// No `-` separator between index and value.
    #[error("missing index separator")]
    MissingSeparator,

    /// Index is empty, not decimal, zero or above 255.
    #[error("invalid share index")]
    InvalidIndex,

    /// Value is not valid hex.
    #[error("share value is not hex")]
    InvalidHex,

    /// Value decodes to the wrong number of bytes.
    #[error("share value has length {actual}, expected {expected}")]
    InvalidLength {
        /// Expected byte length.
        expected: usize,
        /// Decoded byte length.
        actual: usize,
    },
}

impl Share {
    /// Encode as `"<index>-<lowercase hex>"`.
    #[must_use]
    pub fn encode(&self) -> Zeroizing<String> {
        let hex = Zeroizing::new(hex::encode(self.data()));
        Zeroizing::new(format!("{}-{}", self.index(), hex.as_str()))
    }
}

impl FromStr for Share {
    type Err = ShareDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, value) = s
            .trim()
            .split_once('-')
            .ok_or(ShareDecodeError::MissingSeparator)?;

        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ShareDecodeError::InvalidIndex);
        }
        let index: u8 = index.parse().map_err(|_| ShareDecodeError::InvalidIndex)?;

        let data =
            Zeroizing::new(hex::decode(value).map_err(|_| ShareDecodeError::InvalidHex)?);
        if data.len() != MASTER_SECRET_LEN {
            return Err(ShareDecodeError::InvalidLength {
                expected: MASTER_SECRET_LEN,
                actual: data.len(),
            });
        }

        Self::new(index, data.to_vec()).map_err(|_| ShareDecodeError::InvalidIndex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_hex() -> String {
        "0f".repeat(MASTER_SECRET_LEN)
    }

    #[test]
    fn encode_then_parse_preserves_share() {
        let share = Share::new(3, vec![0xAB; MASTER_SECRET_LEN]).unwrap();
        let text = share.encode();
        assert!(text.starts_with("3-abab"));
        assert_eq!(text.parse::<Share>().unwrap(), share);
    }

    #[test]
    fn parse_accepts_uppercase_and_surrounding_whitespace() {
        let text = format!("  5-{}\n", "AB".repeat(MASTER_SECRET_LEN));
        let share: Share = text.parse().unwrap();
        assert_eq!(share.index(), 5);
        assert_eq!(share.data(), &[0xAB; MASTER_SECRET_LEN]);
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert_eq!(
            value_hex().parse::<Share>().unwrap_err(),
            ShareDecodeError::MissingSeparator
        );
    }

    #[test]
    fn parse_rejects_bad_indices() {
        for index in ["", "0", "256", "+1", "x", "1 "] {
            let text = format!("{index}-{}", value_hex());
            assert_eq!(
                text.parse::<Share>().unwrap_err(),
                ShareDecodeError::InvalidIndex,
                "index {index:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_non_hex_value() {
        let text = format!("1-{}zz", "0f".repeat(MASTER_SECRET_LEN - 1));
        assert_eq!(
            text.parse::<Share>().unwrap_err(),
            ShareDecodeError::InvalidHex
        );
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            "1-abcd".parse::<Share>().unwrap_err(),
            ShareDecodeError::InvalidLength {
                expected: MASTER_SECRET_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn decode_error_never_echoes_input() {
        let err = "7-deadbeef".parse::<Share>().unwrap_err();
        assert!(!err.to_string().contains("deadbeef"));
    }
}
