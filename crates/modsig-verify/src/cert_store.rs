//! Ordered, in-memory store of trusted leaf certificates.
//!
//! The store provides:
//! - Insertion-ordered iteration, which fixes which certificate wins when
//!   several verify the same module
//! - Deduplication by fingerprint, last load wins
//! - Constant-time fingerprint lookup
//! - Cheap snapshots; entries are reference counted

use std::path::{Path, PathBuf};
use std::sync::Arc;

use modsig_crypto::utils::normalize_fingerprint;
use modsig_crypto::{CertEncoding, Certificate, CryptoProvider, default_provider};
use serde::{Serialize, Serializer};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use tracing::{debug, info, warn};

/// Certificate file names `load_dir` looks for, in load order
pub const RECOGNIZED_CERT_FILES: [&str; 5] = [
    "user_secureboot.crt",
    "user_secureboot.pem",
    "user_secureboot.der",
    "phoenixguard.crt",
    "phoenixguard.pem",
];

/// A stored certificate and where it came from
#[derive(Debug, Clone)]
pub struct StoreEntry {
    certificate: Arc<Certificate>,
    source: Option<PathBuf>,
}

impl StoreEntry {
    /// The parsed certificate
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// File the certificate was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Inventory row for one stored certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// Lowercase hex SHA-256 of the DER encoding
    pub fingerprint: String,
    /// Subject common name
    pub subject: Option<String>,
    /// File the certificate was loaded from
    pub source: Option<PathBuf>,
    /// Encoding of the source bytes
    #[serde(serialize_with = "serialize_encoding")]
    pub encoding: CertEncoding,
    /// Public key algorithm name
    pub key_algorithm: String,
}

fn serialize_encoding<S: Serializer>(encoding: &CertEncoding, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(encoding.name())
}

/// Trust store of leaf certificates
#[derive(Debug, Clone, Default)]
pub struct CertStore {
    entries: Vec<StoreEntry>,
}

impl CertStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of stored certificates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no certificates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Certificates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> + '_ {
        self.entries.iter().map(StoreEntry::certificate)
    }

    /// Entries in insertion order, with their sources
    pub fn entries(&self) -> &[StoreEntry] {
        &self.entries
    }

    /// Add a shared certificate.
    ///
    /// Returns `true` when it was appended. A certificate whose fingerprint is
    /// already present replaces the stored entry in place and returns `false`.
    pub fn add_shared(&mut self, certificate: Arc<Certificate>, source: Option<PathBuf>) -> bool {
        let entry = StoreEntry {
            certificate,
            source,
        };
        match self.position(entry.certificate.fingerprint()) {
            Some(slot) => {
                debug!(
                    fingerprint = entry.certificate.fingerprint(),
                    "replacing duplicate certificate"
                );
                if let Some(existing) = self.entries.get_mut(slot) {
                    *existing = entry;
                }
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    /// Add a parsed certificate. See [`CertStore::add_shared`].
    pub fn add(&mut self, certificate: Certificate, source: Option<PathBuf>) -> bool {
        self.add_shared(Arc::new(certificate), source)
    }

    /// Parse `bytes` as PEM or DER and add the certificate.
    ///
    /// Returns the number of certificates appended, `0` or `1`.
    pub fn load_bytes_with<P: CryptoProvider + ?Sized>(
        &mut self,
        provider: &P,
        bytes: &[u8],
        source: Option<PathBuf>,
    ) -> usize {
        match provider.cert_from_bytes(bytes) {
            Ok(certificate) => usize::from(self.add(certificate, source)),
            Err(e) => {
                warn!(source = ?source, "Failed to parse certificate: {}", e);
                0
            }
        }
    }

    /// Load one certificate file with the default provider.
    ///
    /// Returns `1` when a new certificate was appended, `0` when the file
    /// could not be read or parsed or was already present.
    pub fn load_file(&mut self, path: &Path) -> usize {
        self.load_file_with(default_provider(), path)
    }

    /// Load one certificate file with `provider`.
    pub fn load_file_with<P: CryptoProvider + ?Sized>(&mut self, provider: &P, path: &Path) -> usize {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), "Failed to open certificate file: {}", e);
                return 0;
            }
        };
        let added = self.load_bytes_with(provider, &bytes, Some(path.to_path_buf()));
        if added > 0 {
            info!(path = %path.display(), "Loaded certificate");
        }
        added
    }

    /// Load every recognized certificate file present in `dir` with the
    /// default provider. Returns the number appended.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        self.load_dir_with(default_provider(), dir)
    }

    /// Load every recognized certificate file present in `dir` with
    /// `provider`, in [`RECOGNIZED_CERT_FILES`] order.
    pub fn load_dir_with<P: CryptoProvider + ?Sized>(&mut self, provider: &P, dir: &Path) -> usize {
        let loaded: usize = RECOGNIZED_CERT_FILES
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| path.is_file())
            .map(|path| self.load_file_with(provider, &path))
            .sum();
        debug!(dir = %dir.display(), loaded, "scanned certificate directory");
        loaded
    }

    /// Append every entry of `other`, deduplicating as [`CertStore::add_shared`].
    ///
    /// Returns the number appended.
    pub fn merge(&mut self, other: CertStore) -> usize {
        other
            .entries
            .into_iter()
            .map(|entry| usize::from(self.add_shared(entry.certificate, entry.source)))
            .sum()
    }

    /// Look up a certificate by fingerprint.
    ///
    /// Accepts upper case and `:` separators. Every stored fingerprint is
    /// compared, in constant time, whether or not an earlier one matched.
    pub fn get(&self, fingerprint: &str) -> Option<&Certificate> {
        let wanted = normalize_fingerprint(fingerprint)?;
        let mut index = 0u64;
        let mut found = Choice::from(0);
        for (i, entry) in self.entries.iter().enumerate() {
            let hit = entry
                .certificate
                .fingerprint()
                .as_bytes()
                .ct_eq(wanted.as_bytes());
            index.conditional_assign(&(i as u64), hit);
            found |= hit;
        }
        if bool::from(found) {
            let slot = usize::try_from(index).ok()?;
            self.entries.get(slot).map(StoreEntry::certificate)
        } else {
            None
        }
    }

    /// Whether a certificate with this fingerprint is stored
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.get(fingerprint).is_some()
    }

    /// A copy sharing every certificate with this store.
    pub fn snapshot(&self) -> CertStore {
        self.clone()
    }

    /// Describe every stored certificate, in store order.
    pub fn inventory(&self) -> Vec<CertificateInfo> {
        self.entries
            .iter()
            .map(|entry| CertificateInfo {
                fingerprint: entry.certificate.fingerprint().to_string(),
                subject: entry.certificate.subject().map(str::to_string),
                source: entry.source.clone(),
                encoding: entry.certificate.encoding(),
                key_algorithm: entry.certificate.public_key().algorithm_name().to_string(),
            })
            .collect()
    }

    /// Drop every certificate, leaving the store empty.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Release the store and every certificate it holds.
    pub fn close(self) {
        drop(self);
    }

    fn position(&self, fingerprint: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.certificate.fingerprint_ct_eq(fingerprint))
    }
}
