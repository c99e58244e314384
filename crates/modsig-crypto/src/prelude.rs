//! Prelude for modsig-crypto
//!
//! Re-exports the types and traits needed to hash module content and check
//! signatures.

pub use crate::algorithm::{HashAlgorithm, SignatureAlgorithm};
pub use crate::certificate::{CertEncoding, Certificate, PublicKey};
pub use crate::error::{CryptoError, CryptoResult};
pub use crate::provider::{CryptoProvider, ModuleSource};
pub use crate::rustcrypto::{RustCryptoProvider, default_provider, pkcs1v15_scheme};
