//! Minimal PEM armor handling for X.509 certificates.
//!
//! Only the `CERTIFICATE` label is recognised. Exactly one armored block is
//! decoded; anything after its END line is ignored.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{CryptoError, CryptoResult};

/// Opening armor line of a PEM certificate
pub const PEM_BEGIN: &[u8] = b"-----BEGIN CERTIFICATE-----";

/// Closing armor line of a PEM certificate
pub const PEM_END: &[u8] = b"-----END CERTIFICATE-----";

/// How far into a file the BEGIN line may start for it to count as PEM
pub const PEM_SNIFF_LEN: usize = 64;

/// Returns `true` when the BEGIN line appears within the first
/// [`PEM_SNIFF_LEN`] bytes.
pub fn looks_like_pem(data: &[u8]) -> bool {
    let head = data.get(..PEM_SNIFF_LEN).unwrap_or(data);
    find(head, PEM_BEGIN).is_some()
}

/// Strip one `CERTIFICATE` armor and base64-decode its body into DER.
pub fn decode_certificate(data: &[u8]) -> CryptoResult<Vec<u8>> {
    let begin = find(data, PEM_BEGIN)
        .ok_or_else(|| CryptoError::Pem("missing BEGIN CERTIFICATE line".to_string()))?;
    let body_start = begin.saturating_add(PEM_BEGIN.len());
    let rest = data.get(body_start..).unwrap_or_default();

    let end = find(rest, PEM_END)
        .ok_or_else(|| CryptoError::Pem("missing END CERTIFICATE line".to_string()))?;
    let body = rest.get(..end).unwrap_or_default();

    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    if compact.is_empty() {
        return Err(CryptoError::Pem("empty certificate body".to_string()));
    }

    Ok(STANDARD.decode(compact)?)
}

/// Wrap DER bytes in certificate armor with 64-column lines.
pub fn encode_certificate(der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / 64 + 64);
    out.push_str("-----BEGIN CERTIFICATE-----\n");
    for line in encoded.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str("-----END CERTIFICATE-----\n");
    out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
