//! Reconstruction of the new file from an escaped old file and a
//! [`PatchData`] (component F): a batch form and a bounded-memory streaming
//! form.
//!
//! Grounded on `Patch.hpp`'s `getNewFileContent` and `writeNewFileContent`.
//! The streaming form mirrors the original's buffering rule exactly: flush
//! and unescape only once the accumulated buffer exceeds the caller's
//! threshold *and* does not currently end on a bare `escape` byte (which
//! would otherwise split an escape sequence across two unescape calls).

use std::io::Write;

use crate::error::PatchError;
use crate::escape::{unescape, EscapeParams};
use crate::patch::PatchData;

/// Reconstructs the full new file in memory.
///
/// Fails with [`PatchError::CorruptPatch`] if any chunk's
/// `[source_position, source_position + length)` range falls outside
/// `escaped_old_file`.
pub fn get_new_file_content(escaped_old_file: &[u8], patch: &PatchData) -> Result<Vec<u8>, PatchError> {
    let mut escaped_new = Vec::new();

    for chunk in &patch.chunks {
        if chunk.is_literal() {
            escaped_new.extend_from_slice(&chunk.literal);
        } else {
            let begin = chunk.source_position as usize;
            let end = begin
                .checked_add(chunk.length as usize)
                .ok_or_else(|| PatchError::CorruptPatch("chunk range overflows usize".to_owned()))?;
            if end > escaped_old_file.len() {
                return Err(PatchError::CorruptPatch(format!(
                    "chunk references [{}, {}) beyond old file of length {}",
                    begin,
                    end,
                    escaped_old_file.len()
                )));
            }
            escaped_new.extend_from_slice(&escaped_old_file[begin..end]);
        }
    }

    unescape(&escaped_new, &patch.escape_params)
}

/// Reconstructs the new file directly to `out`, flushing (and unescaping)
/// in chunks of roughly `max_buffer_size` bytes rather than materializing
/// the whole escaped new file in memory first.
///
/// `max_buffer_size` must be at least 2, so a flush point can never land
/// inside a two-byte escape sequence indefinitely (the flush is deferred by
/// at most one pending `escape` byte).
pub fn write_new_file_content<W: Write>(
    out: &mut W,
    escaped_old_file: &[u8],
    patch: &PatchData,
    max_buffer_size: usize,
) -> Result<(), PatchError> {
    assert!(max_buffer_size >= 2, "max_buffer_size must allow at least one escape pair");

    let mut pending = Vec::new();

    let mut flush = |pending: &mut Vec<u8>, params: &EscapeParams, out: &mut W| -> Result<(), PatchError> {
        if pending.is_empty() {
            return Ok(());
        }
        let unescaped = unescape(pending, params)?;
        out.write_all(&unescaped)?;
        pending.clear();
        Ok(())
    };

    for chunk in &patch.chunks {
        if chunk.is_literal() {
            pending.extend_from_slice(&chunk.literal);
        } else {
            let begin = chunk.source_position as usize;
            let end = begin
                .checked_add(chunk.length as usize)
                .ok_or_else(|| PatchError::CorruptPatch("chunk range overflows usize".to_owned()))?;
            if end > escaped_old_file.len() {
                return Err(PatchError::CorruptPatch(format!(
                    "chunk references [{}, {}) beyond old file of length {}",
                    begin,
                    end,
                    escaped_old_file.len()
                )));
            }
            pending.extend_from_slice(&escaped_old_file[begin..end]);
        }

        if pending.len() > max_buffer_size && pending.last() != Some(&patch.escape_params.escape) {
            flush(&mut pending, &patch.escape_params, out)?;
        }
    }

    flush(&mut pending, &patch.escape_params, out)?;
    Ok(())
}
