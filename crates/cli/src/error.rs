//! Error types for pgmodverify

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Certificate directory not found: {}", .0.display())]
    CertDirNotFound(PathBuf),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
