//! Differencing engine (component D): turns an escaped new file into a
//! sequence of [`DataChunk`]s against the section set built over the
//! escaped old file.
//!
//! Grounded on `ARPatcher.cpp`'s `generateIndexFile` main loop: at each
//! cursor position in the escaped new file, every section's suffix tree is
//! searched in parallel for the longest prefix match (`std::execution::par_unseq`
//! + `bestMatch`, here `rayon`'s `par_iter().map(...).collect()` over an
//! `IndexedParallelIterator`, which preserves section order for the
//! tie-break rule); the longest match wins, ties resolved by lowest section
//! index (first element of an iterator ordered by index that a stable
//! max-by-key keeps on ties — see `pick_best` below).

use rayon::prelude::*;

use crate::cst::best_match;
use crate::config::{INITIAL_PESSIMISTIC_COUNTER, LOWEST_REFERENCED_BYTES_COUNT};
use crate::error::PatchError;
use crate::patch::DataChunk;
use crate::section::Section;

/// Chooses, among one `bestMatch` result per section, the longest match,
/// breaking ties in favor of the lowest section index.
///
/// `results[i]` is `(begin, end)` within `sections[i].data` for the match
/// found in that section. Returns `(section_index, begin, length)` of the
/// winner, or `None` if every section produced a zero-length match.
fn pick_best(results: &[(usize, usize)]) -> Option<(usize, usize, usize)> {
    let mut best: Option<(usize, usize, usize)> = None;
    for (i, &(begin, end)) in results.iter().enumerate() {
        let length = end - begin;
        if length == 0 {
            continue;
        }
        match best {
            Some((_, _, best_len)) if best_len >= length => {}
            _ => best = Some((i, begin, length)),
        }
    }
    best
}

/// Runs the differencing loop over `new_escaped` against `sections`,
/// producing the chunk sequence spec.md §4.D defines.
///
/// `minimum_chunk_size` is `max(LOWEST_REFERENCED_BYTES_COUNT, floor(new_escaped.len() * min_chunk_factor))`,
/// computed by the caller (it depends on the *unescaped* new file's
/// estimated size per spec.md §4.D, which the caller already has access to
/// via [`crate::escape::EscapeParams::estimated_new_size`]).
///
/// Fails with [`PatchError::TooLarge`] if a chunk's length or source
/// position would not fit the wire format's 32-bit fields.
pub fn generate_chunks(
    new_escaped: &[u8],
    sections: &[Section],
    minimum_chunk_size: usize,
) -> Result<Vec<DataChunk>, PatchError> {
    let mut chunks = Vec::new();
    let mut cursor = 0usize;
    let mut pessimistic_counter = INITIAL_PESSIMISTIC_COUNTER;
    let len = new_escaped.len();

    while cursor < len {
        let query = &new_escaped[cursor..];

        let results: Vec<(usize, usize)> = sections
            .par_iter()
            .map(|section| best_match(&section.cst, &section.data, query))
            .collect();

        let winner = pick_best(&results);

        match winner {
            Some((section_idx, begin, length)) if length >= minimum_chunk_size => {
                let source_position = sections[section_idx].offset + begin;
                chunks.push(DataChunk::reference(length, source_position)?);
                cursor += length;
                pessimistic_counter = INITIAL_PESSIMISTIC_COUNTER;
            }
            other => {
                // `other` still holds a sub-threshold match, if one was found;
                // its length carries forward into the next literal span's
                // size exactly as ARPatcher.cpp's `length = end - begin`
                // does, rather than being dropped on the floor.
                let sub_threshold_length = other.map(|(_, _, length)| length).unwrap_or(0);
                pessimistic_counter += 1i64.max(pessimistic_counter / 2);
                let step = 1i64.max(pessimistic_counter) as usize * minimum_chunk_size;
                let take = (sub_threshold_length + step).max(1).min(len - cursor);
                chunks.push(DataChunk::literal(new_escaped[cursor..cursor + take].to_vec())?);
                cursor += take;
            }
        }
    }

    Ok(chunks)
}
