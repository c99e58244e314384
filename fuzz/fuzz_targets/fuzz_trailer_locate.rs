//! Fuzzes appended-trailer location over whole module images.
//!
//! Run with:
//!   cargo fuzz run fuzz_trailer_locate

#![no_main]

use libfuzzer_sys::fuzz_target;
use modsig_trailer::locate_bytes;

fuzz_target!(|data: &[u8]| {
    // Must never panic. Any layout returned must stay inside the input.
    if let Ok(layout) = locate_bytes(data) {
        assert!(layout.content_end <= data.len() as u64);
        assert!(layout.signature_range().end <= data.len() as u64);
    }
});
