//! Appended module signature verification
//!
//! Decides whether a kernel-module file carries a valid appended signature
//! made by the key of one of a set of trusted X.509 certificates.
//!
//! - [`cert_store`]: the ordered trust store and its directory loader
//! - [`verifier`]: trailer, digest and per-certificate verify, in that order
//! - [`result`]: the [`VerifyResult`] value object
//! - [`default_store`]: the process-wide store behind the three-call API
//! - [`config`]: JSON-loadable verifier configuration
//!
//! Verification never returns an error: every failure, from an unopenable
//! file to an untrusted signer, is reported in the result.
//!
//! # Example
//!
//! ```no_run
//! use modsig_verify::prelude::*;
//! use std::path::Path;
//!
//! let mut store = CertStore::new();
//! store.load_dir(Path::new("/etc/phoenixguard/certs"));
//!
//! let result = verify_module_signature(&store, Path::new("nvidia.ko"));
//! if result.valid {
//!     println!("signed by {}", result.signer.unwrap_or_default());
//! } else {
//!     println!("rejected: {}", result.error_message.unwrap_or_default());
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cert_store;
pub mod config;
pub mod default_store;
pub mod error;
pub mod prelude;
pub mod result;
pub mod verifier;

pub use cert_store::{CertStore, CertificateInfo, RECOGNIZED_CERT_FILES, StoreEntry};
pub use config::VerifierConfig;
pub use error::VerifyError;
pub use result::VerifyResult;
pub use verifier::{Verifier, verify_module_signature};
