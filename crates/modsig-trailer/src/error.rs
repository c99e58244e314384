//! Trailer decoding errors

use thiserror::Error;

/// Why a trailer that carries MAGIC was rejected.
///
/// Every variant renders with the `Malformed signature trailer` prefix so the
/// text can be handed to callers unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// One of the three reserved header bytes is set
    #[error("Malformed signature trailer: nonzero header padding")]
    NonZeroPadding,

    /// The `algo` byte names no known public-key algorithm
    #[error("Malformed signature trailer: unknown public-key algorithm id {0}")]
    UnknownAlgorithm(u8),

    /// The `hash` byte names no known digest
    #[error("Malformed signature trailer: unknown hash algorithm id {0}")]
    UnknownHash(u8),

    /// `sig_len` is zero
    #[error("Malformed signature trailer: zero-length signature")]
    EmptySignature,

    /// `sig_len` is larger than half the file
    #[error(
        "Malformed signature trailer: signature length {sig_len} exceeds half of file length {file_len}"
    )]
    OversizedSignature {
        /// Declared signature length
        sig_len: u32,
        /// Length of the whole module file
        file_len: u64,
    },

    /// The declared field lengths do not fit in the file
    #[error("Malformed signature trailer: declared lengths exceed file size")]
    LengthMismatch,
}

/// Trailer location errors
#[derive(Error, Debug)]
pub enum TrailerError {
    /// The file is too short or does not end with MAGIC
    #[error("No signature found in module")]
    NoSignature,

    /// MAGIC is present but the header fails validation
    #[error("{0}")]
    Malformed(#[from] MalformedReason),

    /// The source could not be seeked or read
    #[error("Failed to read module signature trailer: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for trailer operations
pub type TrailerResult<T> = std::result::Result<T, TrailerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reason_has_prefix() {
        let reasons = [
            MalformedReason::NonZeroPadding,
            MalformedReason::UnknownAlgorithm(7),
            MalformedReason::UnknownHash(9),
            MalformedReason::EmptySignature,
            MalformedReason::OversizedSignature {
                sig_len: 900,
                file_len: 1000,
            },
            MalformedReason::LengthMismatch,
        ];
        for reason in reasons {
            assert!(
                reason.to_string().starts_with("Malformed signature trailer"),
                "{reason:?}"
            );
        }
    }

    #[test]
    fn test_malformed_passes_reason_through() {
        let err = TrailerError::from(MalformedReason::UnknownHash(5));
        assert_eq!(
            err.to_string(),
            "Malformed signature trailer: unknown hash algorithm id 5"
        );
        assert_eq!(
            TrailerError::NoSignature.to_string(),
            "No signature found in module"
        );
    }
}
