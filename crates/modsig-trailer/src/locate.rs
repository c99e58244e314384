//! Locating the trailer at the end of a module file.

use std::io::{Cursor, Read, Seek, SeekFrom};

use tracing::{debug, trace};

use crate::MAGIC;
use crate::error::{TrailerError, TrailerResult};
use crate::header::{HEADER_LEN, TRAILER_MIN, TrailerHeader, TrailerLayout};

/// Find and validate the trailer of `source`.
///
/// Performs one seek to the end, one seek back to the header and a single
/// read of header plus MAGIC. The position of `source` afterwards is
/// unspecified.
///
/// # Errors
///
/// - [`TrailerError::NoSignature`] when the source is shorter than
///   [`TRAILER_MIN`] or does not end with [`MAGIC`]
/// - [`TrailerError::Malformed`] when MAGIC is present but the header is
///   rejected
/// - [`TrailerError::Io`] when seeking or reading fails
pub fn locate<R: Read + Seek + ?Sized>(source: &mut R) -> TrailerResult<TrailerLayout> {
    let file_len = source.seek(SeekFrom::End(0))?;
    if file_len < TRAILER_MIN {
        trace!(file_len, "module shorter than trailer");
        return Err(TrailerError::NoSignature);
    }

    source.seek(SeekFrom::Start(file_len - TRAILER_MIN))?;
    let mut tail = [0u8; HEADER_LEN + MAGIC.len()];
    source.read_exact(&mut tail)?;

    let Some((header_bytes, magic)) = tail.split_first_chunk::<HEADER_LEN>() else {
        return Err(TrailerError::NoSignature);
    };
    if magic != MAGIC.as_slice() {
        trace!(file_len, "no signature magic");
        return Err(TrailerError::NoSignature);
    }

    let header = TrailerHeader::from_bytes(header_bytes);
    debug!(
        algo = header.algo,
        hash = header.hash,
        id_type = header.id_type,
        sig_len = header.sig_len,
        file_len,
        "decoded trailer header"
    );

    let layout = header.validate(file_len)?;
    Ok(layout)
}

/// [`locate`] over an in-memory module image.
///
/// # Errors
///
/// Same as [`locate`], except that I/O errors cannot occur.
pub fn locate_bytes(module: &[u8]) -> TrailerResult<TrailerLayout> {
    locate(&mut Cursor::new(module))
}

/// Whether `module` ends with MAGIC, without validating the header.
pub fn has_magic(module: &[u8]) -> bool {
    module.len() >= TRAILER_MIN as usize && module.ends_with(MAGIC)
}
