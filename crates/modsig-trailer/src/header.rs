//! The 12-byte header that sits immediately before MAGIC.

use std::ops::Range;

use modsig_crypto::{HashAlgorithm, SignatureAlgorithm};

use crate::MAGIC;
use crate::error::MalformedReason;

/// Size of the trailer header on disk
pub const HEADER_LEN: usize = 12;

/// Smallest file that can carry a trailer: header plus MAGIC
pub const TRAILER_MIN: u64 = (HEADER_LEN + MAGIC.len()) as u64;

/// Signer-id kind written by signing tools
pub const DEFAULT_ID_TYPE: u8 = 0x01;

/// Raw trailer header.
///
/// ```text
/// offset  size  field
///      0     1  algo
///      1     1  hash
///      2     1  id_type
///      3     1  signer_len
///      4     1  key_id_len
///      5     3  padding (zero)
///      8     4  sig_len (big-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailerHeader {
    /// Public-key algorithm id
    pub algo: u8,
    /// Digest id
    pub hash: u8,
    /// Signer-id kind; carried but not checked
    pub id_type: u8,
    /// Bytes of signer name after the signature
    pub signer_len: u8,
    /// Bytes of key identifier after the signer name
    pub key_id_len: u8,
    /// Reserved, must be zero
    pub padding: [u8; 3],
    /// Signature blob length
    pub sig_len: u32,
}

impl TrailerHeader {
    /// Header for a signature with no signer name or key id.
    pub const fn new(algorithm: SignatureAlgorithm, hash: HashAlgorithm, sig_len: u32) -> Self {
        Self {
            algo: algorithm.id(),
            hash: hash.id(),
            id_type: DEFAULT_ID_TYPE,
            signer_len: 0,
            key_id_len: 0,
            padding: [0; 3],
            sig_len,
        }
    }

    /// Decode the header from its on-disk form.
    pub const fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        Self {
            algo: bytes[0],
            hash: bytes[1],
            id_type: bytes[2],
            signer_len: bytes[3],
            key_id_len: bytes[4],
            padding: [bytes[5], bytes[6], bytes[7]],
            sig_len: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        }
    }

    /// Encode the header to its on-disk form.
    pub const fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let sig = self.sig_len.to_be_bytes();
        [
            self.algo,
            self.hash,
            self.id_type,
            self.signer_len,
            self.key_id_len,
            self.padding[0],
            self.padding[1],
            self.padding[2],
            sig[0],
            sig[1],
            sig[2],
            sig[3],
        ]
    }

    /// Bytes the trailer occupies at the end of the file, excluding the
    /// signed content.
    pub const fn trailer_len(&self) -> u64 {
        TRAILER_MIN + self.signer_len as u64 + self.key_id_len as u64 + self.sig_len as u64
    }

    /// Check the header against a file of `file_len` bytes.
    ///
    /// Checks run in a fixed order: padding, algorithm, hash, signature
    /// length bounds, then the overall length invariant.
    pub fn validate(&self, file_len: u64) -> Result<TrailerLayout, MalformedReason> {
        if self.padding != [0; 3] {
            return Err(MalformedReason::NonZeroPadding);
        }
        let algorithm = SignatureAlgorithm::from_id(self.algo)
            .ok_or(MalformedReason::UnknownAlgorithm(self.algo))?;
        let hash =
            HashAlgorithm::from_id(self.hash).ok_or(MalformedReason::UnknownHash(self.hash))?;

        if self.sig_len == 0 {
            return Err(MalformedReason::EmptySignature);
        }
        if u64::from(self.sig_len) > file_len / 2 {
            return Err(MalformedReason::OversizedSignature {
                sig_len: self.sig_len,
                file_len,
            });
        }

        let content_end = file_len
            .checked_sub(self.trailer_len())
            .ok_or(MalformedReason::LengthMismatch)?;

        Ok(TrailerLayout {
            algorithm,
            hash,
            id_type: self.id_type,
            signer_len: self.signer_len,
            key_id_len: self.key_id_len,
            sig_len: self.sig_len,
            content_end,
            file_len,
        })
    }
}

/// Validated positions of every trailer region inside a module file.
///
/// `content_end + sig_len + signer_len + key_id_len + HEADER_LEN + MAGIC.len() == file_len`
/// holds for every value produced by [`TrailerHeader::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerLayout {
    /// Public-key algorithm family
    pub algorithm: SignatureAlgorithm,
    /// Digest over the signed content
    pub hash: HashAlgorithm,
    /// Signer-id kind as written
    pub id_type: u8,
    /// Signer name length
    pub signer_len: u8,
    /// Key identifier length
    pub key_id_len: u8,
    /// Signature blob length
    pub sig_len: u32,
    /// End of the signed content; also the signature offset
    pub content_end: u64,
    /// Length of the whole file
    pub file_len: u64,
}

impl TrailerLayout {
    /// `[0, content_end)`
    pub fn content_range(&self) -> Range<u64> {
        0..self.content_end
    }

    /// `[content_end, content_end + sig_len)`
    pub fn signature_range(&self) -> Range<u64> {
        let end = self.content_end + u64::from(self.sig_len);
        self.content_end..end
    }

    /// Signer name bytes, directly after the signature
    pub fn signer_range(&self) -> Range<u64> {
        let start = self.signature_range().end;
        start..start + u64::from(self.signer_len)
    }

    /// Key identifier bytes, directly after the signer name
    pub fn key_id_range(&self) -> Range<u64> {
        let start = self.signer_range().end;
        start..start + u64::from(self.key_id_len)
    }

    /// Offset of the [`TrailerHeader`]
    pub fn header_offset(&self) -> u64 {
        self.key_id_range().end
    }
}
