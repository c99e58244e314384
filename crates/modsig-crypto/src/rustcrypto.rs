//! [`CryptoProvider`] backed by the RustCrypto `sha1`/`sha2` and `rsa` crates.

use std::io::{ErrorKind, SeekFrom};

use digest::Digest;
use rsa::Pkcs1v15Sign;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use tracing::{debug, trace};

use crate::algorithm::{HashAlgorithm, SignatureAlgorithm};
use crate::certificate::{CertEncoding, Certificate, PublicKey};
use crate::error::{CryptoError, CryptoResult};
use crate::pem;
use crate::provider::{CryptoProvider, ModuleSource};

/// Default digest read chunk
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Smallest accepted digest read chunk
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Largest accepted digest read chunk
pub const MAX_CHUNK_SIZE: usize = 64 * 1024;

static DEFAULT_PROVIDER: RustCryptoProvider = RustCryptoProvider::new();

/// The shared provider used when the caller does not supply one.
pub fn default_provider() -> &'static RustCryptoProvider {
    &DEFAULT_PROVIDER
}

/// PKCS#1 v1.5 signature scheme for `hash`, with the matching DigestInfo prefix.
pub fn pkcs1v15_scheme(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha1 => Pkcs1v15Sign::new::<Sha1>(),
        HashAlgorithm::Sha224 => Pkcs1v15Sign::new::<Sha224>(),
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Stateless provider; the only setting is the read chunk used while hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustCryptoProvider {
    chunk_size: usize,
}

impl Default for RustCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RustCryptoProvider {
    /// Provider with [`DEFAULT_CHUNK_SIZE`] reads.
    pub const fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Provider with a custom read chunk, clamped to
    /// [`MIN_CHUNK_SIZE`]..=[`MAX_CHUNK_SIZE`].
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE),
        }
    }

    /// Read chunk in bytes
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn stream<D: Digest>(&self, source: &mut dyn ModuleSource, end: u64) -> CryptoResult<Vec<u8>> {
        source.seek(SeekFrom::Start(0))?;

        let mut hasher = D::new();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut remaining = end;

        while remaining > 0 {
            let want = usize::try_from(remaining)
                .unwrap_or(usize::MAX)
                .min(buffer.len());
            let Some(window) = buffer.get_mut(..want) else {
                return Err(CryptoError::HashFailed("read window out of range".to_string()));
            };

            let read = match source.read(window) {
                Ok(0) => {
                    return Err(CryptoError::ShortRead {
                        expected: end,
                        actual: end.saturating_sub(remaining),
                    });
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            hasher.update(window.get(..read).unwrap_or_default());
            remaining = remaining.saturating_sub(read as u64);
        }

        Ok(hasher.finalize().to_vec())
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn supports(&self, algorithm: SignatureAlgorithm) -> bool {
        match algorithm {
            SignatureAlgorithm::Rsa => true,
        }
    }

    fn digest(
        &self,
        hash: HashAlgorithm,
        source: &mut dyn ModuleSource,
        end: u64,
    ) -> CryptoResult<Vec<u8>> {
        trace!(%hash, end, "hashing module content");
        match hash {
            HashAlgorithm::Sha1 => self.stream::<Sha1>(source, end),
            HashAlgorithm::Sha224 => self.stream::<Sha224>(source, end),
            HashAlgorithm::Sha256 => self.stream::<Sha256>(source, end),
            HashAlgorithm::Sha384 => self.stream::<Sha384>(source, end),
            HashAlgorithm::Sha512 => self.stream::<Sha512>(source, end),
        }
    }

    fn verify(
        &self,
        public_key: &PublicKey,
        hash: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> bool {
        let PublicKey::Rsa(key) = public_key else {
            return false;
        };
        if digest.len() != hash.digest_len() {
            return false;
        }
        key.verify(pkcs1v15_scheme(hash), digest, signature).is_ok()
    }

    fn cert_from_bytes(&self, bytes: &[u8]) -> CryptoResult<Certificate> {
        if pem::looks_like_pem(bytes) {
            match pem::decode_certificate(bytes).and_then(|der| {
                Certificate::from_der(&der, CertEncoding::Pem, self.sha256_digest(&der))
            }) {
                Ok(cert) => return Ok(cert),
                Err(e) => debug!("PEM decode failed, trying DER: {}", e),
            }
        }
        Certificate::from_der(bytes, CertEncoding::Der, self.sha256_digest(bytes))
    }

    fn sha256_digest(&self, bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }
}
