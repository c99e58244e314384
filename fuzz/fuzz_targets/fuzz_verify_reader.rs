//! Fuzzes the full verification pipeline with an empty trust store.
//!
//! Run with:
//!   cargo fuzz run fuzz_verify_reader

#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use modsig_verify::{CertStore, Verifier};

fuzz_target!(|data: &[u8]| {
    let store = CertStore::new();
    let result = Verifier::new(&store).verify_reader(&mut Cursor::new(data));
    assert!(!result.valid);
    assert!(result.is_consistent());
});
