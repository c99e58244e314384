//! Verification failure kinds

use modsig_trailer::MalformedReason;
use thiserror::Error;

/// Why a module did not verify.
///
/// `Display` yields the exact text placed in
/// [`VerifyResult::error_message`](crate::VerifyResult::error_message).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// The module file could not be opened
    #[error("Failed to open module file")]
    Open,

    /// The module carries no trailer
    #[error("No signature found in module")]
    NoSignature,

    /// The trailer failed structural validation
    #[error("{0}")]
    Malformed(MalformedReason),

    /// Seeking or reading the trailer failed
    #[error("Failed to read module signature trailer")]
    TrailerRead,

    /// The signature bytes could not be read
    #[error("Failed to extract signature data")]
    SignatureRead,

    /// Digesting the module content failed
    #[error("Failed to calculate module hash")]
    Hash,

    /// The provider cannot verify the trailer's algorithm
    #[error("Unknown public-key algorithm")]
    UnsupportedAlgorithm,

    /// Every certificate was tried and none verified
    #[error("Signature verification failed against all certificates")]
    NoTrustedSigner,

    /// The store held no certificates to try
    #[error("No certificates loaded")]
    EmptyTrustStore,
}

impl VerifyError {
    /// Whether a result carrying this error still reports a signature.
    pub const fn has_signature(&self) -> bool {
        !matches!(
            self,
            VerifyError::Open | VerifyError::NoSignature | VerifyError::TrailerRead
        )
    }

    /// Whether the signature region offsets are meaningful for this error.
    pub const fn has_layout(&self) -> bool {
        self.has_signature() && !matches!(self, VerifyError::Malformed(_))
    }
}
