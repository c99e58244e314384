//! Scripted [`CryptoProvider`] for tests that need no key material.
//!
//! Digests and certificate parsing are delegated to the real provider; only
//! the verify decision is scripted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use modsig_crypto::{
    Certificate, CryptoError, CryptoProvider, CryptoResult, HashAlgorithm, ModuleSource,
    PublicKey, RustCryptoProvider, SignatureAlgorithm,
};
use parking_lot::Mutex;

#[derive(Debug)]
enum Script {
    /// Answers in order, `false` once exhausted
    Sequence(VecDeque<bool>),
    /// `true` only for this exact digest and signature
    Expect { digest: Vec<u8>, signature: Vec<u8> },
}

/// Provider whose `verify` answers come from a script.
#[derive(Debug)]
pub struct ScriptedProvider {
    inner: RustCryptoProvider,
    script: Mutex<Script>,
    supports_rsa: bool,
    fail_digest: bool,
    verify_calls: AtomicUsize,
    digest_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn with_script(script: Script) -> Self {
        Self {
            inner: RustCryptoProvider::new(),
            script: Mutex::new(script),
            supports_rsa: true,
            fail_digest: false,
            verify_calls: AtomicUsize::new(0),
            digest_calls: AtomicUsize::new(0),
        }
    }

    /// Answer successive `verify` calls from `answers`, then `false`.
    pub fn sequence(answers: impl IntoIterator<Item = bool>) -> Self {
        Self::with_script(Script::Sequence(answers.into_iter().collect()))
    }

    /// Accept exactly one digest/signature pair.
    pub fn expecting(digest: Vec<u8>, signature: Vec<u8>) -> Self {
        Self::with_script(Script::Expect { digest, signature })
    }

    /// Reject every signature.
    pub fn rejecting() -> Self {
        Self::sequence([])
    }

    /// Report that no algorithm is supported.
    pub fn unsupported(mut self) -> Self {
        self.supports_rsa = false;
        self
    }

    /// Make every digest call fail.
    pub fn failing_digest(mut self) -> Self {
        self.fail_digest = true;
        self
    }

    /// Number of `verify` calls so far
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// Number of `digest` calls so far
    pub fn digest_calls(&self) -> usize {
        self.digest_calls.load(Ordering::SeqCst)
    }
}

impl CryptoProvider for ScriptedProvider {
    fn supports(&self, algorithm: SignatureAlgorithm) -> bool {
        self.supports_rsa && self.inner.supports(algorithm)
    }

    fn digest(
        &self,
        hash: HashAlgorithm,
        source: &mut dyn ModuleSource,
        end: u64,
    ) -> CryptoResult<Vec<u8>> {
        self.digest_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_digest {
            return Err(CryptoError::HashFailed("scripted failure".to_string()));
        }
        self.inner.digest(hash, source, end)
    }

    fn verify(
        &self,
        _public_key: &PublicKey,
        _hash: HashAlgorithm,
        digest: &[u8],
        signature: &[u8],
    ) -> bool {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        match &mut *self.script.lock() {
            Script::Sequence(answers) => answers.pop_front().unwrap_or(false),
            Script::Expect {
                digest: want_digest,
                signature: want_signature,
            } => digest == want_digest.as_slice() && signature == want_signature.as_slice(),
        }
    }

    fn cert_from_bytes(&self, bytes: &[u8]) -> CryptoResult<Certificate> {
        self.inner.cert_from_bytes(bytes)
    }

    fn sha256_digest(&self, bytes: &[u8]) -> [u8; 32] {
        self.inner.sha256_digest(bytes)
    }
}
