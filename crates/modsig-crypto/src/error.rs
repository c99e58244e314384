//! Error types for cryptographic operations

use thiserror::Error;

/// Cryptographic operation errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// I/O error while streaming module content
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source ended before the requested digest range was consumed
    #[error("Short read while hashing: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Number of bytes the digest range covers
        expected: u64,
        /// Number of bytes actually read
        actual: u64,
    },

    /// Digest context could not be created or updated
    #[error("Hash computation failed: {0}")]
    HashFailed(String),

    /// DER certificate could not be decoded
    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    /// PEM armor was missing or malformed
    #[error("PEM decode error: {0}")]
    Pem(String),

    /// Base64 body of a PEM block did not decode
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Certificate carries a key this provider cannot use
    #[error("Unsupported public key: {0}")]
    UnsupportedKey(String),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;
