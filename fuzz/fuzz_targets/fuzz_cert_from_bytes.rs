//! Fuzzes PEM/DER certificate decoding.
//!
//! Run with:
//!   cargo fuzz run fuzz_cert_from_bytes

#![no_main]

use libfuzzer_sys::fuzz_target;
use modsig_crypto::{CryptoProvider, default_provider};

fuzz_target!(|data: &[u8]| {
    let _ = default_provider().cert_from_bytes(data);
});
