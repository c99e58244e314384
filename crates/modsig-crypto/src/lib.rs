//! Cryptographic primitives for appended module signatures
//!
//! This crate provides the hashing, RSA verification and certificate decoding
//! that module signature verification is built on:
//!
//! - [`algorithm`]: hash and public-key algorithm identifiers as they appear
//!   in a signature trailer
//! - [`certificate`]: X.509 certificate decoding and SHA-256 fingerprints
//! - [`pem`]: `CERTIFICATE` armor handling
//! - [`provider`]: the [`CryptoProvider`] capability trait
//! - [`rustcrypto`]: the default provider built on the RustCrypto crates
//! - [`error`]: Error types for cryptographic operations
//!
//! # Security Considerations
//!
//! - Fingerprint comparisons use constant-time operations via the `subtle` crate
//! - Digests are streamed in bounded chunks; memory use does not grow with
//!   module size
//! - Signatures are verified over the prehashed digest; the digest is never
//!   hashed a second time
//!
//! # Example
//!
//! ```
//! use modsig_crypto::prelude::*;
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = HashAlgorithm::from_id(2).ok_or("unknown hash id")?;
//! let mut module = Cursor::new(b"module bytes".to_vec());
//!
//! let digest = default_provider().digest(hash, &mut module, 6)?;
//! assert_eq!(digest.len(), hash.digest_len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod algorithm;
pub mod certificate;
pub mod error;
pub mod pem;
pub mod prelude;
pub mod provider;
pub mod rustcrypto;

pub use algorithm::{HashAlgorithm, SignatureAlgorithm};
pub use certificate::{CertEncoding, Certificate, PublicKey};
pub use error::{CryptoError, CryptoResult};
pub use provider::{CryptoProvider, ModuleSource};
pub use rustcrypto::{RustCryptoProvider, default_provider, pkcs1v15_scheme};

/// Fingerprint and hex helpers
pub mod utils {
    use sha2::{Digest, Sha256};
    use subtle::ConstantTimeEq;

    /// Length of a hex SHA-256 fingerprint
    pub const FINGERPRINT_HEX_LEN: usize = 64;

    /// Compute the certificate fingerprint: lowercase hex SHA-256 of the DER bytes
    pub fn compute_fingerprint(der: &[u8]) -> String {
        compute_sha256_hex(der)
    }

    /// Compute SHA256 hash of data and return as hex string
    pub fn compute_sha256_hex(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Normalize a user-supplied fingerprint: strip `:` separators and
    /// lowercase. Returns `None` unless the result is 64 hex digits.
    pub fn normalize_fingerprint(input: &str) -> Option<String> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| *c != ':')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if cleaned.len() == FINGERPRINT_HEX_LEN && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(cleaned)
        } else {
            None
        }
    }

    /// Constant-time string equality
    pub fn ct_eq_str(a: &str, b: &str) -> bool {
        a.as_bytes().ct_eq(b.as_bytes()).into()
    }

}
