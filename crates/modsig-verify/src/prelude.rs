//! Prelude for modsig-verify
//!
//! Re-exports the store, verifier and result types together with the crypto
//! and trailer types they are built from.

pub use crate::cert_store::{CertStore, CertificateInfo, RECOGNIZED_CERT_FILES, StoreEntry};
pub use crate::config::VerifierConfig;
pub use crate::error::VerifyError;
pub use crate::result::VerifyResult;
pub use crate::verifier::{Verifier, verify_module_signature};
pub use modsig_crypto::prelude::*;
pub use modsig_trailer::{MAGIC, MalformedReason, TrailerError, TrailerLayout};
