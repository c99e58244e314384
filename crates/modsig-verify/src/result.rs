//! The value returned by every verification call.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::VerifyError;

/// Outcome of verifying one module.
///
/// Fields mirror the C result structure; `error_message` is the only
/// human-readable channel and `valid` the only machine-readable verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResult {
    /// A trailer was found
    pub has_signature: bool,
    /// A trusted certificate verified the signature
    pub valid: bool,
    /// Fingerprint of the certificate that verified
    pub signer: Option<String>,
    /// Public-key algorithm name, set when valid
    pub algorithm: Option<String>,
    /// Digest name from the trailer
    pub hash_algorithm: Option<String>,
    /// Failure text; present iff `valid` is false
    pub error_message: Option<String>,
    /// Start of the signature, `-1` when there is none
    pub signature_offset: i64,
    /// Signature length, `0` when there is none
    pub signature_size: u64,
    /// Wall-clock time the call started
    pub verification_time: DateTime<Utc>,
    #[serde(skip)]
    error: Option<VerifyError>,
}

impl Default for VerifyResult {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifyResult {
    /// A result stamped with the current time and no verdict yet.
    pub fn new() -> Self {
        Self {
            has_signature: false,
            valid: false,
            signer: None,
            algorithm: None,
            hash_algorithm: None,
            error_message: None,
            signature_offset: -1,
            signature_size: 0,
            verification_time: Utc::now(),
            error: None,
        }
    }

    /// Shorthand for a fresh result that failed with `error`.
    pub fn failed(error: VerifyError) -> Self {
        Self::new().fail(error)
    }

    /// Record `error` as the outcome.
    ///
    /// Signature presence and offsets are reset where the error kind implies
    /// they are not meaningful.
    pub fn fail(mut self, error: VerifyError) -> Self {
        if !error.has_signature() {
            self.has_signature = false;
        } else if matches!(error, VerifyError::Malformed(_)) {
            self.has_signature = true;
        }
        if !error.has_layout() {
            self.signature_offset = -1;
            self.signature_size = 0;
        }
        self.valid = false;
        self.signer = None;
        self.algorithm = None;
        self.error_message = Some(error.to_string());
        self.error = Some(error);
        self
    }

    /// Record a successful verification by `signer`.
    pub(crate) fn succeed(mut self, signer: &str, algorithm: &str) -> Self {
        self.has_signature = true;
        self.valid = true;
        self.signer = Some(signer.to_string());
        self.algorithm = Some(algorithm.to_string());
        self.error_message = None;
        self.error = None;
        self
    }

    /// Typed failure kind, when the module did not verify.
    pub fn error(&self) -> Option<VerifyError> {
        self.error
    }

    /// Whether the result obeys the field invariants: a valid result names
    /// its signer and algorithms and carries no error, and a result without a
    /// signature is invalid with no offsets.
    pub fn is_consistent(&self) -> bool {
        let valid_ok = !self.valid
            || (self.has_signature
                && self.error_message.is_none()
                && self.signer.is_some()
                && self.algorithm.is_some()
                && self.hash_algorithm.is_some());
        let unsigned_ok = self.has_signature
            || (!self.valid && self.signature_offset == -1 && self.signature_size == 0);
        let message_ok = self.valid != self.error_message.is_some();
        valid_ok && unsigned_ok && message_ok
    }

    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
