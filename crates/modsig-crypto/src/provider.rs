//! The capability surface every verification path goes through.
//!
//! The verifier never calls a hash or RSA implementation directly. It holds a
//! [`CryptoProvider`], which lets tests substitute a scripted provider that
//! needs no key material.

use std::io::{Read, Seek};

use crate::algorithm::{HashAlgorithm, SignatureAlgorithm};
use crate::certificate::Certificate;
use crate::certificate::PublicKey;
use crate::error::CryptoResult;

/// A readable, seekable byte source such as an open module file.
pub trait ModuleSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> ModuleSource for T {}

/// Digest and public-key verify primitives.
///
/// Implementations must be safe to share across threads; a single
/// [`Certificate`] may be passed to `verify` from several threads at once.
pub trait CryptoProvider: Send + Sync {
    /// Whether signatures of this algorithm family can be verified.
    fn supports(&self, algorithm: SignatureAlgorithm) -> bool;

    /// Stream bytes `[0, end)` of `source` through `hash` and return the raw
    /// digest.
    ///
    /// Memory use does not depend on `end`.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or ends before `end`.
    fn digest(
        &self,
        hash: HashAlgorithm,
        source: &mut dyn ModuleSource,
        end: u64,
    ) -> CryptoResult<Vec<u8>>;

    /// Verify `signature` over an already-computed `digest`.
    ///
    /// Returns `false` on any mismatch, including keys of the wrong family
    /// and signatures of the wrong length. The digest is never re-hashed.
    fn verify(
        &self,
        public_key: &PublicKey,
        hash: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> bool;

    /// Decode a certificate from PEM or DER bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when neither encoding yields a certificate.
    fn cert_from_bytes(&self, bytes: &[u8]) -> CryptoResult<Certificate>;

    /// SHA-256 of `bytes`, used for fingerprints.
    fn sha256_digest(&self, bytes: &[u8]) -> [u8; 32];
}
