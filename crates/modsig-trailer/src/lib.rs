//! Appended module signature trailer
//!
//! A signed module is the original module bytes followed by a trailer:
//!
//! ```text
//! [ content | signature | signer name | key id | header (12) | MAGIC (28) ]
//! ```
//!
//! This crate finds that trailer, validates its header and reports where each
//! region lives. It never reads the signature or content itself.
//!
//! # Example
//!
//! ```
//! use modsig_trailer::{TrailerError, locate_bytes};
//!
//! let unsigned = b"\x7fELF plain module";
//! assert!(matches!(locate_bytes(unsigned), Err(TrailerError::NoSignature)));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod header;
pub mod locate;

pub use error::{MalformedReason, TrailerError, TrailerResult};
pub use header::{DEFAULT_ID_TYPE, HEADER_LEN, TRAILER_MIN, TrailerHeader, TrailerLayout};
pub use locate::{has_magic, locate, locate_bytes};

/// Sentinel that ends every signed module
pub const MAGIC: &[u8; 28] = b"~Module signature appended~\n";
