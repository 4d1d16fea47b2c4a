//! Error types shared by every component of the patch toolkit.
//!
//! Mirrors the teacher's hand-rolled error style (`frame::types::Lz4FError`):
//! a plain enum with a manual `Display` + `std::error::Error` impl rather than
//! a derive-macro crate, since the library surface is small and each variant
//! already carries a human-readable message.

use std::fmt;
use std::io;

/// Errors produced by any stage of patch generation, serialization,
/// reconstruction, or verification.
///
/// Corresponds to the error kinds enumerated in the design's error-handling
/// section: `IoError`, `FormatError`, `CorruptPatch`, `TooLarge`,
/// `VerifyFailed`. `UsageError` is represented separately by `anyhow::Error`
/// at the CLI layer (see `cli::args`) since it never crosses the library
/// boundary.
#[derive(Debug)]
pub enum PatchError {
    /// Underlying I/O failure (file not found, short read, write failure...).
    Io(io::Error),
    /// The index file's container format is malformed.
    Format(String),
    /// A chunk or the unescape step refers to data that is not there.
    CorruptPatch(String),
    /// A size exceeds the 2^32-1 addressing limit of the wire format.
    TooLarge(String),
    /// Post-generation verification found the reconstructed file differs
    /// from the on-disk new file.
    VerifyFailed,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Io(e) => write!(f, "I/O error: {}", e),
            PatchError::Format(msg) => write!(f, "malformed patch file: {}", msg),
            PatchError::CorruptPatch(msg) => write!(f, "corrupt patch: {}", msg),
            PatchError::TooLarge(msg) => write!(f, "input too large: {}", msg),
            PatchError::VerifyFailed => {
                write!(f, "verification failed: reconstructed file does not match new file")
            }
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PatchError {
    fn from(e: io::Error) -> Self {
        PatchError::Io(e)
    }
}

/// Convenience alias used throughout the library.
pub type PatchResult<T> = Result<T, PatchError>;
