//! Process-wide certificate store behind the classic three-call API.
//!
//! The store is empty at process start, grows with each load and is emptied
//! by [`cleanup`]. Loads parse certificates before taking the write lock, and
//! verification works on a snapshot taken under the read lock, so no lock is
//! held across file I/O and a load never stalls an in-flight verify.

use std::path::Path;

use parking_lot::RwLock;
use tracing::info;

use crate::cert_store::CertStore;
use crate::result::VerifyResult;
use crate::verifier::Verifier;

static DEFAULT_STORE: RwLock<CertStore> = RwLock::new(CertStore::new());

/// Load the recognized certificate files in `dir` into the default store.
///
/// Returns the number of certificates added.
pub fn load_certificates_from_dir(dir: &Path) -> usize {
    let mut staged = CertStore::new();
    staged.load_dir(dir);
    let added = DEFAULT_STORE.write().merge(staged);
    info!(dir = %dir.display(), added, "Loaded certificates into default store");
    added
}

/// Load a single certificate file into the default store.
pub fn load_certificate_file(path: &Path) -> usize {
    let mut staged = CertStore::new();
    staged.load_file(path);
    DEFAULT_STORE.write().merge(staged)
}

/// Verify `path` against a snapshot of the default store.
pub fn verify_module_signature(path: &Path) -> VerifyResult {
    let store = snapshot();
    Verifier::new(&store).verify_path(path)
}

/// A snapshot of the default store.
pub fn snapshot() -> CertStore {
    DEFAULT_STORE.read().snapshot()
}

/// Number of certificates in the default store
pub fn len() -> usize {
    DEFAULT_STORE.read().len()
}

/// Whether the default store is empty
pub fn is_empty() -> bool {
    DEFAULT_STORE.read().is_empty()
}

/// Empty the default store.
///
/// Snapshots already handed out keep their certificates alive.
pub fn cleanup() {
    DEFAULT_STORE.write().clear();
}
