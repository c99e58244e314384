//! Fuzzes header decoding and validation against arbitrary file lengths.
//!
//! Run with:
//!   cargo fuzz run fuzz_trailer_header

#![no_main]

use libfuzzer_sys::fuzz_target;
use modsig_trailer::{HEADER_LEN, TrailerHeader};

fuzz_target!(|data: &[u8]| {
    let Some((bytes, rest)) = data.split_first_chunk::<HEADER_LEN>() else {
        return;
    };
    let file_len = rest
        .first_chunk::<8>()
        .map_or(0, |b| u64::from_le_bytes(*b));

    let header = TrailerHeader::from_bytes(bytes);
    assert_eq!(TrailerHeader::from_bytes(&header.to_bytes()), header);
    let _ = header.validate(file_len);
});
