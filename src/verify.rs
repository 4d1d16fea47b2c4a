//! Post-generation verification (component G).
//!
//! Grounded on `ARPatcher.cpp`'s `verify(patchDataFile)`: reconstructs the
//! new file in memory from the generated patch and the escaped old file,
//! then compares it byte-for-byte against the on-disk new file before the
//! generator declares success. Keeps the "no partial/incorrect index file is
//! ever left behind" guarantee — the caller only persists the index file
//! after this passes.

use std::fs;
use std::path::Path;

use crate::error::PatchError;
use crate::patch::PatchData;
use crate::reconstruct::get_new_file_content;

/// Reconstructs the new file from `escaped_old_file` and `patch`, reads
/// `new_file_path` from disk, and compares them byte-for-byte.
///
/// Returns `Ok(())` on a match and [`PatchError::VerifyFailed`] otherwise (or
/// any I/O / reconstruction error encountered along the way).
pub fn verify(escaped_old_file: &[u8], patch: &PatchData, new_file_path: &Path) -> Result<(), PatchError> {
    let reconstructed = get_new_file_content(escaped_old_file, patch)?;
    let on_disk = fs::read(new_file_path)?;

    if reconstructed != on_disk {
        return Err(PatchError::VerifyFailed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::{escape, EscapeParams};
    use crate::patch::DataChunk;

    fn params() -> EscapeParams {
        EscapeParams::new(0, 1, 2, 3).unwrap()
    }

    fn patch_of(chunks: Vec<DataChunk>) -> PatchData {
        PatchData {
            version: crate::config::PATCH_VERSION,
            old_file_name: "old".to_owned(),
            new_file_name: "new".to_owned(),
            escape_params: params(),
            chunks,
        }
    }

    #[test]
    fn verify_passes_for_correct_reconstruction() {
        let old = escape(b"hello world", &params());
        let patch = patch_of(vec![DataChunk::reference(old.len(), 0).unwrap()]);

        let dir = tempfile::tempdir().unwrap();
        let new_path = dir.path().join("new.bin");
        fs::write(&new_path, b"hello world").unwrap();

        assert!(verify(&old, &patch, &new_path).is_ok());
    }

    #[test]
    fn verify_fails_when_on_disk_file_differs() {
        let old = escape(b"hello world", &params());
        let patch = patch_of(vec![DataChunk::reference(old.len(), 0).unwrap()]);

        let dir = tempfile::tempdir().unwrap();
        let new_path = dir.path().join("new.bin");
        fs::write(&new_path, b"hello WORLD").unwrap();

        assert!(matches!(verify(&old, &patch, &new_path), Err(PatchError::VerifyFailed)));
    }

    #[test]
    fn verify_propagates_io_error_for_missing_file() {
        let old = escape(b"hello world", &params());
        let patch = patch_of(vec![DataChunk::reference(old.len(), 0).unwrap()]);
        let missing = Path::new("/nonexistent/path/should/not/exist.bin");
        assert!(matches!(verify(&old, &patch, missing), Err(PatchError::Io(_))));
    }
}
