//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use modsig_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_err, must_some, must_with};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{
    EC_P256_CERT_PEM, EC_P256_FINGERPRINT, SIGNER_A_CERT_DER, SIGNER_A_CERT_PEM,
    SIGNER_A_FINGERPRINT, SIGNER_A_REISSUED_CERT_PEM, SIGNER_A_REISSUED_FINGERPRINT,
    SIGNER_A_SUBJECT, SIGNER_B_CERT_DER, SIGNER_B_CERT_PEM, SIGNER_B_FINGERPRINT,
    SignedModuleBuilder, TestSigner, assemble_module, cert_dir, digest_of, unsigned_module,
    write_file,
};

#[cfg(feature = "mock")]
pub use crate::mock::ScriptedProvider;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
