//! RSA/X.509 fixtures and signed-module builders.
//!
//! The certificates under `fixtures/` are self-signed RSA-2048 leaves. Their
//! PKCS#8 private keys are checked in alongside so tests can produce real
//! PKCS#1 v1.5 signatures.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use modsig_crypto::{CryptoProvider, HashAlgorithm, SignatureAlgorithm, default_provider, pkcs1v15_scheme};
use modsig_trailer::{DEFAULT_ID_TYPE, MAGIC, TrailerHeader};
use rsa::RsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use tempfile::TempDir;

use crate::must::{must, must_with};

/// PEM certificate for signer A
pub const SIGNER_A_CERT_PEM: &[u8] = include_bytes!("../fixtures/signer_a.pem");
/// DER certificate for signer A
pub const SIGNER_A_CERT_DER: &[u8] = include_bytes!("../fixtures/signer_a.der");
/// PKCS#8 private key for signer A
pub const SIGNER_A_KEY_PEM: &str = include_str!("../fixtures/signer_a.key");
/// SHA-256 of signer A's DER certificate
pub const SIGNER_A_FINGERPRINT: &str =
    "ae81953ed553e414961fce9f1b4abe832c5a57ecb145938797cfaebf8be76110";
/// Subject common name of signer A
pub const SIGNER_A_SUBJECT: &str = "PhoenixGuard Test signer_a";

/// PEM certificate for signer B, an unrelated key
pub const SIGNER_B_CERT_PEM: &[u8] = include_bytes!("../fixtures/signer_b.pem");
/// DER certificate for signer B
pub const SIGNER_B_CERT_DER: &[u8] = include_bytes!("../fixtures/signer_b.der");
/// PKCS#8 private key for signer B
pub const SIGNER_B_KEY_PEM: &str = include_str!("../fixtures/signer_b.key");
/// SHA-256 of signer B's DER certificate
pub const SIGNER_B_FINGERPRINT: &str =
    "3eb10db64857c697ff7c4be179fd45b4ff91dbd4a53e1f2b2536c0d668592565";

/// A second certificate over signer A's key
pub const SIGNER_A_REISSUED_CERT_PEM: &[u8] = include_bytes!("../fixtures/signer_a_reissued.pem");
/// SHA-256 of the reissued certificate's DER
pub const SIGNER_A_REISSUED_FINGERPRINT: &str =
    "53be896daf718427eba88dd9ef4b8db0922c4523442d59f0fd82c329cc09adf7";

/// ECDSA P-256 certificate; parses but cannot verify RSA signatures
pub const EC_P256_CERT_PEM: &[u8] = include_bytes!("../fixtures/ec_p256.pem");
/// SHA-256 of the EC certificate's DER
pub const EC_P256_FINGERPRINT: &str =
    "4b7121fba5ee98bffc5b0f162ca9353d36d2ef440a498d6f6c88647a07cb69f1";

/// Checked-in signing identities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSigner {
    /// Signer A
    A,
    /// Signer B
    B,
}

impl TestSigner {
    /// PEM certificate
    pub fn cert_pem(self) -> &'static [u8] {
        match self {
            TestSigner::A => SIGNER_A_CERT_PEM,
            TestSigner::B => SIGNER_B_CERT_PEM,
        }
    }

    /// DER certificate
    pub fn cert_der(self) -> &'static [u8] {
        match self {
            TestSigner::A => SIGNER_A_CERT_DER,
            TestSigner::B => SIGNER_B_CERT_DER,
        }
    }

    /// Certificate fingerprint
    pub fn fingerprint(self) -> &'static str {
        match self {
            TestSigner::A => SIGNER_A_FINGERPRINT,
            TestSigner::B => SIGNER_B_FINGERPRINT,
        }
    }

    /// Decoded private key.
    ///
    /// # Panics
    ///
    /// Panics if the checked-in key does not parse.
    pub fn private_key(self) -> RsaPrivateKey {
        let pem = match self {
            TestSigner::A => SIGNER_A_KEY_PEM,
            TestSigner::B => SIGNER_B_KEY_PEM,
        };
        must_with(RsaPrivateKey::from_pkcs8_pem(pem), "fixture private key")
    }

    /// PKCS#1 v1.5 signature over an already-computed digest.
    ///
    /// # Panics
    ///
    /// Panics if signing fails, for example on a digest of the wrong length.
    pub fn sign_digest(self, hash: HashAlgorithm, digest: &[u8]) -> Vec<u8> {
        must_with(
            self.private_key().sign(pkcs1v15_scheme(hash), digest),
            "fixture signing",
        )
    }

    /// Hash `content` with `hash` and sign the digest.
    pub fn sign(self, hash: HashAlgorithm, content: &[u8]) -> Vec<u8> {
        self.sign_digest(hash, &digest_of(hash, content))
    }
}

/// Digest of `content` through the default provider.
///
/// # Panics
///
/// Panics if the in-memory digest fails.
pub fn digest_of(hash: HashAlgorithm, content: &[u8]) -> Vec<u8> {
    let mut cursor = Cursor::new(content);
    must(default_provider().digest(hash, &mut cursor, content.len() as u64))
}

/// Concatenate the regions of a signed module.
pub fn assemble_module(
    content: &[u8],
    signature: &[u8],
    signer_name: &[u8],
    key_id: &[u8],
    header: &TrailerHeader,
) -> Vec<u8> {
    let mut module = Vec::with_capacity(
        content.len() + signature.len() + signer_name.len() + key_id.len() + 64,
    );
    module.extend_from_slice(content);
    module.extend_from_slice(signature);
    module.extend_from_slice(signer_name);
    module.extend_from_slice(key_id);
    module.extend_from_slice(&header.to_bytes());
    module.extend_from_slice(MAGIC);
    module
}

/// Module image that starts like an ELF object and has no trailer.
pub fn unsigned_module(len: usize) -> Vec<u8> {
    let mut module = b"\x7fELF".to_vec();
    module.extend((0..len.saturating_sub(4)).map(|i| (i % 199) as u8));
    module.truncate(len);
    module
}

/// Builder for signed module images.
///
/// Defaults produce a valid SHA-256 module signed by [`TestSigner::A`]. The
/// override setters write header fields verbatim so malformed trailers can be
/// produced.
#[derive(Debug, Clone)]
pub struct SignedModuleBuilder {
    content: Vec<u8>,
    signer: TestSigner,
    hash: HashAlgorithm,
    algo_id: u8,
    hash_id: Option<u8>,
    id_type: u8,
    padding: [u8; 3],
    sig_len: Option<u32>,
    signer_name: Vec<u8>,
    key_id: Vec<u8>,
    signature: Option<Vec<u8>>,
}

impl SignedModuleBuilder {
    /// Start from `content`
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            signer: TestSigner::A,
            hash: HashAlgorithm::Sha256,
            algo_id: SignatureAlgorithm::Rsa.id(),
            hash_id: None,
            id_type: DEFAULT_ID_TYPE,
            padding: [0; 3],
            sig_len: None,
            signer_name: Vec::new(),
            key_id: Vec::new(),
            signature: None,
        }
    }

    /// Sign with `signer`
    pub fn signer(mut self, signer: TestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Digest the content with `hash`
    pub fn hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    /// Raw `algo` byte
    pub fn algo_id(mut self, id: u8) -> Self {
        self.algo_id = id;
        self
    }

    /// Raw `hash` byte, independent of the digest actually used
    pub fn hash_id(mut self, id: u8) -> Self {
        self.hash_id = Some(id);
        self
    }

    /// Raw `id_type` byte
    pub fn id_type(mut self, id_type: u8) -> Self {
        self.id_type = id_type;
        self
    }

    /// Raw padding bytes
    pub fn padding(mut self, padding: [u8; 3]) -> Self {
        self.padding = padding;
        self
    }

    /// Declared `sig_len`, independent of the signature written
    pub fn sig_len(mut self, sig_len: u32) -> Self {
        self.sig_len = Some(sig_len);
        self
    }

    /// Signer name bytes placed after the signature
    pub fn signer_name(mut self, name: &[u8]) -> Self {
        self.signer_name = name.to_vec();
        self
    }

    /// Key id bytes placed after the signer name
    pub fn key_id(mut self, key_id: &[u8]) -> Self {
        self.key_id = key_id.to_vec();
        self
    }

    /// Use these signature bytes instead of signing
    pub fn signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Produce the module image.
    pub fn build(&self) -> Vec<u8> {
        let signature = match &self.signature {
            Some(sig) => sig.clone(),
            None => self.signer.sign(self.hash, &self.content),
        };

        let header = TrailerHeader {
            algo: self.algo_id,
            hash: self.hash_id.unwrap_or(self.hash.id()),
            id_type: self.id_type,
            signer_len: self.signer_name.len() as u8,
            key_id_len: self.key_id.len() as u8,
            padding: self.padding,
            sig_len: self.sig_len.unwrap_or(signature.len() as u32),
        };

        assemble_module(
            &self.content,
            &signature,
            &self.signer_name,
            &self.key_id,
            &header,
        )
    }
}

/// Write `bytes` to `dir/name` and return the path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    must_with(std::fs::write(&path, bytes), "writing fixture file");
    path
}

/// Temporary directory holding the named certificate files.
///
/// # Panics
///
/// Panics if the directory or any file cannot be created.
pub fn cert_dir(files: &[(&str, &[u8])]) -> TempDir {
    let dir = must(tempfile::tempdir());
    for (name, bytes) in files {
        write_file(dir.path(), name, bytes);
    }
    dir
}
