//! Module signature verification against a [`CertStore`].

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use modsig_crypto::{CryptoProvider, RustCryptoProvider, default_provider};
use modsig_trailer::{TrailerError, TrailerLayout, locate};
use tracing::{debug, info, warn};

use crate::cert_store::CertStore;
use crate::error::VerifyError;
use crate::result::VerifyResult;

/// Verifies modules against one store with one provider.
///
/// The first certificate in store order that verifies the signature is
/// reported as the signer; later certificates are not tried.
#[derive(Debug)]
pub struct Verifier<'a, P: CryptoProvider + ?Sized = RustCryptoProvider> {
    store: &'a CertStore,
    provider: &'a P,
}

impl<'a> Verifier<'a> {
    /// Verifier using the default RustCrypto provider
    pub fn new(store: &'a CertStore) -> Self {
        Self {
            store,
            provider: default_provider(),
        }
    }
}

impl<'a, P: CryptoProvider + ?Sized> Verifier<'a, P> {
    /// Verifier using `provider`
    pub fn with_provider(store: &'a CertStore, provider: &'a P) -> Self {
        Self { store, provider }
    }

    /// The store certificates are drawn from
    pub fn store(&self) -> &CertStore {
        self.store
    }

    /// Open and verify the module at `path`.
    ///
    /// Never fails; every problem is reported through the result.
    pub fn verify_path(&self, path: &Path) -> VerifyResult {
        let result = VerifyResult::new();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), "Failed to open module: {}", e);
                return result.fail(VerifyError::Open);
            }
        };
        if file.metadata().is_ok_and(|meta| meta.is_dir()) {
            debug!(path = %path.display(), "module path is a directory");
            return result.fail(VerifyError::NoSignature);
        }
        let result = self.run(result, &mut file);
        log_outcome(path, &result);
        result
    }

    /// Verify an already-open module image.
    pub fn verify_reader<R: Read + Seek>(&self, source: &mut R) -> VerifyResult {
        self.run(VerifyResult::new(), source)
    }

    fn run<R: Read + Seek>(&self, mut result: VerifyResult, source: &mut R) -> VerifyResult {
        let layout = match locate(source) {
            Ok(layout) => layout,
            Err(TrailerError::NoSignature) => return result.fail(VerifyError::NoSignature),
            Err(TrailerError::Malformed(reason)) => {
                warn!("{}", reason);
                return result.fail(VerifyError::Malformed(reason));
            }
            // A file that ends before its trailer can be read has none.
            Err(TrailerError::Io(e))
                if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::IsADirectory) =>
            {
                debug!("Trailer unreadable, treating as unsigned: {}", e);
                return result.fail(VerifyError::NoSignature);
            }
            Err(TrailerError::Io(e)) => {
                debug!("Failed to read trailer: {}", e);
                return result.fail(VerifyError::TrailerRead);
            }
        };

        result.has_signature = true;
        result.signature_offset = i64::try_from(layout.content_end).unwrap_or(i64::MAX);
        result.signature_size = u64::from(layout.sig_len);
        result.hash_algorithm = Some(layout.hash.name().to_string());

        if !self.provider.supports(layout.algorithm) {
            return result.fail(VerifyError::UnsupportedAlgorithm);
        }

        let signature = match read_signature(source, &layout) {
            Ok(signature) => signature,
            Err(e) => {
                debug!("Failed to read signature bytes: {}", e);
                return result.fail(VerifyError::SignatureRead);
            }
        };

        let digest = match self.provider.digest(layout.hash, source, layout.content_end) {
            Ok(digest) => digest,
            Err(e) => {
                debug!("Failed to hash module content: {}", e);
                return result.fail(VerifyError::Hash);
            }
        };

        if self.store.is_empty() {
            return result.fail(VerifyError::EmptyTrustStore);
        }

        for cert in self.store.iter() {
            debug!(fingerprint = cert.fingerprint(), "trying certificate");
            if self
                .provider
                .verify(cert.public_key(), layout.hash, &digest, &signature)
            {
                return result.succeed(cert.fingerprint(), layout.algorithm.name());
            }
        }

        result.fail(VerifyError::NoTrustedSigner)
    }
}

/// Verify the module at `path` against `store` with the default provider.
pub fn verify_module_signature(store: &CertStore, path: &Path) -> VerifyResult {
    Verifier::new(store).verify_path(path)
}

fn read_signature<R: Read + Seek + ?Sized>(
    source: &mut R,
    layout: &TrailerLayout,
) -> std::io::Result<Vec<u8>> {
    source.seek(SeekFrom::Start(layout.content_end))?;
    let mut signature = vec![0u8; layout.sig_len as usize];
    source.read_exact(&mut signature)?;
    Ok(signature)
}

fn log_outcome(path: &Path, result: &VerifyResult) {
    match (&result.signer, &result.error_message) {
        (Some(signer), _) if result.valid => {
            info!(path = %path.display(), signer = %signer, "Module signature verified");
        }
        (_, Some(message)) => {
            debug!(path = %path.display(), "Module did not verify: {}", message);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_unsigned_reader() {
        let store = CertStore::new();
        let result = Verifier::new(&store).verify_reader(&mut Cursor::new(vec![0u8; 2048]));
        assert!(!result.has_signature);
        assert_eq!(result.error(), Some(VerifyError::NoSignature));
        assert!(result.is_consistent());
    }

    #[test]
    fn test_missing_path() -> Result<(), std::io::Error> {
        let dir = tempfile::tempdir()?;
        let store = CertStore::new();
        let result = verify_module_signature(&store, &dir.path().join("missing.ko"));
        assert_eq!(result.error_message.as_deref(), Some("Failed to open module file"));
        assert!(!result.has_signature);
        Ok(())
    }

    #[test]
    fn test_directory_is_unsigned() -> Result<(), std::io::Error> {
        let dir = tempfile::tempdir()?;
        let store = CertStore::new();
        let result = verify_module_signature(&store, dir.path());
        assert!(!result.has_signature);
        assert_eq!(result.error(), Some(VerifyError::NoSignature));
        assert_eq!(result.signature_offset, -1);
        assert!(result.is_consistent());
        Ok(())
    }

    /// Reports a length longer than the bytes it can actually return.
    struct Shrunk {
        inner: Cursor<Vec<u8>>,
        claimed_len: u64,
    }

    impl Read for Shrunk {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Seek for Shrunk {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            match pos {
                SeekFrom::End(offset) => {
                    let at = self.claimed_len.saturating_add_signed(offset);
                    self.inner.seek(SeekFrom::Start(at))
                }
                other => self.inner.seek(other),
            }
        }
    }

    #[test]
    fn test_short_read_is_unsigned() {
        let store = CertStore::new();
        let mut source = Shrunk {
            inner: Cursor::new(vec![0u8; 16]),
            claimed_len: 4096,
        };
        let result = Verifier::new(&store).verify_reader(&mut source);
        assert!(!result.has_signature);
        assert_eq!(result.error(), Some(VerifyError::NoSignature));
        assert!(result.is_consistent());
    }
}
