//! Verifier configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modsig_crypto::rustcrypto::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use modsig_crypto::{CryptoProvider, RustCryptoProvider};
use serde::{Deserialize, Serialize};

use crate::cert_store::CertStore;

/// Where certificates come from and how modules are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Directories scanned for recognized certificate files
    pub cert_dirs: Vec<PathBuf>,
    /// Individual certificate files
    pub cert_files: Vec<PathBuf>,
    /// Digest read chunk in bytes
    pub read_chunk_size: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            cert_dirs: Vec::new(),
            cert_files: Vec::new(),
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl VerifierConfig {
    /// Parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not valid
    /// configuration JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON does not describe a configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json).context("Invalid configuration JSON")?;
        config.read_chunk_size = clamp_chunk(config.read_chunk_size);
        Ok(config)
    }

    /// Add a certificate directory
    pub fn with_cert_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cert_dirs.push(dir.into());
        self
    }

    /// Add a certificate file
    pub fn with_cert_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.cert_files.push(file.into());
        self
    }

    /// Set the digest read chunk, clamped to the supported range
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = clamp_chunk(size);
        self
    }

    /// Provider reading with the configured chunk size
    pub fn provider(&self) -> RustCryptoProvider {
        RustCryptoProvider::with_chunk_size(self.read_chunk_size)
    }

    /// Load every configured directory, then every configured file.
    pub fn build_store<P: CryptoProvider + ?Sized>(&self, provider: &P) -> CertStore {
        let mut store = CertStore::new();
        for dir in &self.cert_dirs {
            store.load_dir_with(provider, dir);
        }
        for file in &self.cert_files {
            store.load_file_with(provider, file);
        }
        store
    }
}

fn clamp_chunk(size: usize) -> usize {
    size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifierConfig::default();
        assert!(config.cert_dirs.is_empty());
        assert_eq!(config.read_chunk_size, 8192);
        assert_eq!(config.provider().chunk_size(), 8192);
    }

    #[test]
    fn test_from_json_fills_defaults_and_clamps() -> anyhow::Result<()> {
        let config = VerifierConfig::from_json_str(
            r#"{ "cert_dirs": ["/etc/phoenixguard"], "read_chunk_size": 1 }"#,
        )?;
        assert_eq!(config.cert_dirs, vec![PathBuf::from("/etc/phoenixguard")]);
        assert!(config.cert_files.is_empty());
        assert_eq!(config.read_chunk_size, 4096);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = VerifierConfig::from_json_str(r#"{ "cert_dir": "/tmp" }"#);
        assert!(matches!(result, Err(_)));
    }

    #[test]
    fn test_builders() {
        let config = VerifierConfig::default()
            .with_cert_dir("/a")
            .with_cert_file("/b/cert.pem")
            .with_read_chunk_size(1 << 30);
        assert_eq!(config.cert_dirs.len(), 1);
        assert_eq!(config.cert_files.len(), 1);
        assert_eq!(config.read_chunk_size, 65536);
    }

    #[test]
    fn test_from_missing_file() -> Result<(), std::io::Error> {
        let dir = tempfile::tempdir()?;
        let result = VerifierConfig::from_json_file(&dir.path().join("nope.json"));
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("Failed to read config file"));
        Ok(())
    }
}
