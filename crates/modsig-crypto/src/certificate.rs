//! Parsed X.509 leaf certificates and their fingerprints.

use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use x509_certificate::{KeyAlgorithm, X509Certificate};

use crate::algorithm::SignatureAlgorithm;
use crate::error::{CryptoError, CryptoResult};
use crate::utils;

/// Encoding the certificate was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertEncoding {
    /// Base64 body inside `CERTIFICATE` armor
    Pem,
    /// Raw DER
    Der,
}

impl CertEncoding {
    /// Lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            CertEncoding::Pem => "pem",
            CertEncoding::Der => "der",
        }
    }
}

/// Public key extracted from a certificate's SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA key usable for PKCS#1 v1.5 verification
    Rsa(RsaPublicKey),
    /// Any other key type; never verifies a module signature
    Unsupported {
        /// Name of the key algorithm as reported by the certificate
        algorithm: String,
    },
}

impl PublicKey {
    /// The trailer algorithm family this key can verify, if any.
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        match self {
            PublicKey::Rsa(_) => Some(SignatureAlgorithm::Rsa),
            PublicKey::Unsupported { .. } => None,
        }
    }

    /// Human-readable key algorithm name
    pub fn algorithm_name(&self) -> &str {
        match self {
            PublicKey::Rsa(_) => SignatureAlgorithm::Rsa.name(),
            PublicKey::Unsupported { algorithm } => algorithm,
        }
    }
}

/// A parsed X.509 certificate plus its cached SHA-256 fingerprint.
///
/// The fingerprint is computed once, over the exact DER bytes, so the same
/// certificate yields the same fingerprint whether it arrived as PEM or DER.
#[derive(Debug, Clone)]
pub struct Certificate {
    der: Vec<u8>,
    fingerprint: String,
    subject: Option<String>,
    encoding: CertEncoding,
    public_key: PublicKey,
}

impl Certificate {
    /// Decode a DER certificate whose SHA-256 has already been computed.
    ///
    /// `encoding` records how the bytes reached us and does not affect
    /// parsing. `sha256` must be the digest of `der`; it becomes the cached
    /// fingerprint.
    pub fn from_der(der: &[u8], encoding: CertEncoding, sha256: [u8; 32]) -> CryptoResult<Self> {
        let parsed = X509Certificate::from_der(der)
            .map_err(|e| CryptoError::CertificateParse(e.to_string()))?;

        let public_key = match parsed.key_algorithm() {
            Some(KeyAlgorithm::Rsa) => {
                let key_data = parsed.public_key_data();
                let key = RsaPublicKey::from_pkcs1_der(key_data.as_ref())
                    .map_err(|e| CryptoError::UnsupportedKey(format!("invalid RSA key: {}", e)))?;
                PublicKey::Rsa(key)
            }
            Some(other) => PublicKey::Unsupported {
                algorithm: format!("{:?}", other).to_lowercase(),
            },
            None => PublicKey::Unsupported {
                algorithm: "unknown".to_string(),
            },
        };

        Ok(Self {
            der: der.to_vec(),
            fingerprint: hex::encode(sha256),
            subject: parsed.subject_common_name(),
            encoding,
            public_key,
        })
    }

    /// DER encoding, exactly as loaded
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Lowercase hex SHA-256 of the DER encoding
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Subject common name, when present
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Encoding the certificate was loaded from
    pub fn encoding(&self) -> CertEncoding {
        self.encoding
    }

    /// Subject public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Compare the fingerprint against `other` in constant time.
    pub fn fingerprint_ct_eq(&self, other: &str) -> bool {
        utils::ct_eq_str(&self.fingerprint, other)
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint_ct_eq(&other.fingerprint)
    }
}

impl Eq for Certificate {}
