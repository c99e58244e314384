//! Command implementations

pub mod certs;
pub mod verify;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use modsig_verify::{CertStore, VerifierConfig};
use tracing::debug;

use crate::error::CliError;

pub use certs::CertsArgs;
pub use verify::VerifyArgs;

/// Where trusted certificates come from
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Directory holding recognized certificate files (repeatable)
    #[arg(long = "cert-dir", value_name = "DIR", env = "PGMODVERIFY_CERT_DIR")]
    pub cert_dirs: Vec<PathBuf>,

    /// Individual certificate file, PEM or DER (repeatable)
    #[arg(long = "cert-file", value_name = "FILE")]
    pub cert_files: Vec<PathBuf>,

    /// JSON verifier configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Configuration file values with command-line sources appended.
    pub fn resolve(&self) -> Result<VerifierConfig> {
        let mut config = match &self.config {
            Some(path) => VerifierConfig::from_json_file(path)?,
            None => VerifierConfig::default(),
        };
        for dir in &self.cert_dirs {
            if !dir.is_dir() {
                return Err(CliError::CertDirNotFound(dir.clone()).into());
            }
            config = config.with_cert_dir(dir);
        }
        for file in &self.cert_files {
            config = config.with_cert_file(file);
        }
        debug!(?config, "resolved verifier configuration");
        Ok(config)
    }

    /// Resolve the configuration and load its store.
    pub fn load(&self) -> Result<(VerifierConfig, CertStore)> {
        let config = self.resolve()?;
        if config.cert_dirs.is_empty() && config.cert_files.is_empty() {
            return Err(CliError::InvalidConfiguration(
                "no certificate sources; pass --cert-dir, --cert-file or --config".to_string(),
            )
            .into());
        }
        let store = config.build_store(&config.provider());
        Ok((config, store))
    }
}
