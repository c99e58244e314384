//! C ABI for module signature verification
//!
//! Exposes the process-wide certificate store and verifier as
//! `libpgmodverify`, matching `include/pgmodverify.h`:
//!
//! ```c
//! int pg_load_certificates_from_dir(const char *cert_dir);
//! pg_verify_result_t *pg_verify_module_signature(const char *module_path);
//! void pg_free_verify_result(pg_verify_result_t *result);
//! void pg_cleanup(void);
//! ```
//!
//! Every string in a result is a NUL-terminated UTF-8 copy owned by the
//! result. Callers release the whole result with `pg_free_verify_result` and
//! never free individual fields. The library installs no log subscriber.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

use std::ffi::{CStr, CString, c_char, c_int, c_long};
use std::path::PathBuf;
use std::ptr;

use modsig_verify::{VerifyError, VerifyResult, default_store};
use tracing::debug;

/// Verification result as laid out in `pg_verify_result_t`
#[repr(C)]
#[derive(Debug)]
pub struct PgVerifyResult {
    /// 1 if the signature is valid, 0 otherwise
    pub valid: c_int,
    /// 1 if the module has a signature, 0 otherwise
    pub has_signature: c_int,
    /// Fingerprint of the verifying certificate, or null
    pub signer: *mut c_char,
    /// Public-key algorithm name, or null
    pub algorithm: *mut c_char,
    /// Digest name, or null
    pub hash_algorithm: *mut c_char,
    /// Failure description, or null when valid
    pub error_message: *mut c_char,
    /// Offset of the signature in the file, -1 when absent
    pub signature_offset: c_long,
    /// Signature length in bytes, 0 when absent
    pub signature_size: usize,
    /// Seconds since the Unix epoch when verification started
    pub verification_time: libc::time_t,
}

impl From<&VerifyResult> for PgVerifyResult {
    fn from(result: &VerifyResult) -> Self {
        Self {
            valid: c_int::from(result.valid),
            has_signature: c_int::from(result.has_signature),
            signer: into_c_string(result.signer.as_deref()),
            algorithm: into_c_string(result.algorithm.as_deref()),
            hash_algorithm: into_c_string(result.hash_algorithm.as_deref()),
            error_message: into_c_string(result.error_message.as_deref()),
            signature_offset: c_long::try_from(result.signature_offset).unwrap_or(-1),
            signature_size: usize::try_from(result.signature_size).unwrap_or(usize::MAX),
            verification_time: libc::time_t::try_from(result.verification_time.timestamp())
                .unwrap_or_default(),
        }
    }
}

impl Drop for PgVerifyResult {
    fn drop(&mut self) {
        for field in [
            &mut self.signer,
            &mut self.algorithm,
            &mut self.hash_algorithm,
            &mut self.error_message,
        ] {
            let raw = std::mem::replace(field, ptr::null_mut());
            if !raw.is_null() {
                // SAFETY: non-null fields are only ever set from
                // `CString::into_raw` and are nulled here before release.
                drop(unsafe { CString::from_raw(raw) });
            }
        }
    }
}

fn into_c_string(value: Option<&str>) -> *mut c_char {
    value
        .and_then(|s| CString::new(s).ok())
        .map_or(ptr::null_mut(), CString::into_raw)
}

/// Borrow a caller path as UTF-8.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn path_from_c(path: *const c_char) -> Option<PathBuf> {
    if path.is_null() {
        return None;
    }
    // SAFETY: non-null and NUL-terminated per this function's contract.
    let raw = unsafe { CStr::from_ptr(path) };
    match raw.to_str() {
        Ok(s) => Some(PathBuf::from(s)),
        Err(e) => {
            debug!("Rejecting non-UTF-8 path: {}", e);
            None
        }
    }
}

/// Load the recognized certificate files in `cert_dir` into the default
/// store. Returns the number added; 0 for a null or non-UTF-8 path.
///
/// # Safety
///
/// `cert_dir` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pg_load_certificates_from_dir(cert_dir: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract.
    let Some(dir) = (unsafe { path_from_c(cert_dir) }) else {
        return 0;
    };
    c_int::try_from(default_store::load_certificates_from_dir(&dir)).unwrap_or(c_int::MAX)
}

/// Verify a module against the default store.
///
/// Always returns a result; a null or non-UTF-8 path yields
/// "Failed to open module file". Release it with [`pg_free_verify_result`].
///
/// # Safety
///
/// `module_path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pg_verify_module_signature(
    module_path: *const c_char,
) -> *mut PgVerifyResult {
    // SAFETY: forwarded caller contract.
    let result = match unsafe { path_from_c(module_path) } {
        Some(path) => default_store::verify_module_signature(&path),
        None => VerifyResult::failed(VerifyError::Open),
    };
    Box::into_raw(Box::new(PgVerifyResult::from(&result)))
}

/// Release a result and every string it holds. Null is a no-op.
///
/// # Safety
///
/// `result` must be null or a pointer returned by
/// [`pg_verify_module_signature`] that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pg_free_verify_result(result: *mut PgVerifyResult) {
    if result.is_null() {
        return;
    }
    // SAFETY: allocated by `Box::into_raw` in `pg_verify_module_signature`
    // and, per the contract, not yet freed.
    drop(unsafe { Box::from_raw(result) });
}

/// Empty the default certificate store.
#[unsafe(no_mangle)]
pub extern "C" fn pg_cleanup() {
    default_store::cleanup();
}
