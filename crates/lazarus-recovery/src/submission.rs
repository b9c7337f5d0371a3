//! Share-set decoding for recovery requests.
//!
//! A submission is eligible for reconstruction when it holds at least `k`
//! decodable shares with pairwise-distinct indices. Extra shares are allowed;
//! the `k` lowest indices are used so the choice is deterministic.

use lazarus_crypto::{Share, ShareDecodeError};
use thiserror::Error;

/// Why a submission was not eligible. Never carries share text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    /// Fewer shares than the threshold.
    #[error("submission has {got} shares, need {need}")]
    TooFewShares {
        /// Shares submitted.
        got: usize,
        /// Threshold.
        need: u8,
    },

    /// More entries than distinct indices can exist.
    #[error("submission has {0} shares, more than any share set")]
    TooManyShares(usize),

    /// A share failed to decode; `position` is its zero-based slot.
    #[error("share at position {position} is malformed: {source}")]
    Malformed {
        /// Slot in the submission.
        position: usize,
        /// Decoder error.
        #[source]
        source: ShareDecodeError,
    },

    /// Two shares carry the same index.
    #[error("duplicate share index {0}")]
    DuplicateIndex(u8),
}

/// Decode `submission` and select the `threshold` shares to reconstruct from.
///
/// # Errors
/// Returns a [`SubmissionError`] describing the first problem found.
pub fn decode_submission<S: AsRef<str>>(
    submission: &[S],
    threshold: u8,
) -> Result<Vec<Share>, SubmissionError> {
    if submission.len() < usize::from(threshold) {
        return Err(SubmissionError::TooFewShares {
            got: submission.len(),
            need: threshold,
        });
    }
    if submission.len() > usize::from(u8::MAX) {
        return Err(SubmissionError::TooManyShares(submission.len()));
    }

    let mut shares = submission
        .iter()
        .enumerate()
        .map(|(position, text)| {
            text.as_ref()
                .parse::<Share>()
                .map_err(|source| SubmissionError::Malformed { position, source })
        })
        .collect::<Result<Vec<Share>, _>>()?;

    shares.sort_unstable_by_key(Share::index);
    if let Some(pair) = shares.windows(2).find(|w| w[0].index() == w[1].index()) {
        return Err(SubmissionError::DuplicateIndex(pair[0].index()));
    }

    shares.truncate(usize::from(threshold));
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use lazarus_crypto::MASTER_SECRET_LEN;

    use super::*;

    fn text(index: u8, fill: u8) -> String {
        Share::new(index, vec![fill; MASTER_SECRET_LEN])
            .unwrap()
            .encode()
            .to_string()
    }

    #[test]
    fn too_few_shares_rejected_before_decoding() {
        let submission = ["garbage", "more garbage"];
        assert_eq!(
            decode_submission(&submission, 3).unwrap_err(),
            SubmissionError::TooFewShares { got: 2, need: 3 }
        );
    }

    #[test]
    fn selects_lowest_indices() {
        let submission = [text(5, 5), text(2, 2), text(4, 4), text(1, 1)];
        let shares = decode_submission(&submission, 3).unwrap();
        let indices: Vec<u8> = shares.iter().map(Share::index).collect();
        assert_eq!(indices, vec![1, 2, 4]);
    }

    #[test]
    fn duplicate_indices_rejected() {
        let submission = [text(1, 1), text(2, 2), text(1, 9)];
        assert_eq!(
            decode_submission(&submission, 3).unwrap_err(),
            SubmissionError::DuplicateIndex(1)
        );
    }

    #[test]
    fn duplicate_beyond_threshold_still_rejected() {
        let submission = [text(1, 1), text(2, 2), text(3, 3), text(4, 4), text(4, 5)];
        assert_eq!(
            decode_submission(&submission, 3).unwrap_err(),
            SubmissionError::DuplicateIndex(4)
        );
    }

    #[test]
    fn malformed_share_reports_position_only() {
        let submission = [text(1, 1), "2-zz".to_string(), text(3, 3)];
        let err = decode_submission(&submission, 3).unwrap_err();
        assert!(matches!(err, SubmissionError::Malformed { position: 1, .. }));
        assert!(!err.to_string().contains("zz"));
    }

    #[test]
    fn oversized_submission_rejected() {
        let submission = vec![String::new(); 256];
        assert_eq!(
            decode_submission(&submission, 3).unwrap_err(),
            SubmissionError::TooManyShares(256)
        );
    }
}
