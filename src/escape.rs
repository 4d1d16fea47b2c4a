//! Byte-escape codec (component A).
//!
//! Removes a chosen byte value (`victim`) from a buffer's alphabet by
//! substituting a reversible two-byte escape sequence, freeing `victim` for
//! use as a sentinel inside the compressed-suffix-tree index (component C
//! requires that `victim` never occur in section data).
//!
//! Grounded on `Escape.hpp`'s `escape`/`unescape`/`findBestEscape` (referenced
//! by `Patch.hpp` and `ARPatcher.cpp` in `examples/original_source/`, though
//! the header itself was not retrieved — its contract is fully determined by
//! its callers and by spec.md §4.A).

use crate::error::PatchError;

/// The four escape byte values plus the generator's size estimate.
///
/// Invariants (checked by [`EscapeParams::new`]): `victim != substitute`,
/// `escape != escape2`, and none of `{substitute, escape, escape2}` equal
/// `victim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeParams {
    pub victim: u8,
    pub substitute: u8,
    pub escape: u8,
    pub escape2: u8,
    pub estimated_new_size: u64,
}

impl EscapeParams {
    /// Builds a validated `EscapeParams`, checking the pairwise-distinctness
    /// invariants from spec.md §3.
    pub fn new(victim: u8, substitute: u8, escape: u8, escape2: u8) -> Result<Self, PatchError> {
        if victim == substitute {
            return Err(PatchError::Format("victim == substitute".to_owned()));
        }
        if escape == escape2 {
            return Err(PatchError::Format("escape == escape2".to_owned()));
        }
        if substitute == victim || escape == victim || escape2 == victim {
            return Err(PatchError::Format(
                "substitute/escape/escape2 must differ from victim".to_owned(),
            ));
        }
        Ok(EscapeParams {
            victim,
            substitute,
            escape,
            escape2,
            estimated_new_size: 0,
        })
    }
}

/// Encodes `input` so that the byte `params.victim` never appears in the
/// output, per the left-to-right rule in spec.md §4.A:
/// - `victim` → `[escape, substitute]`
/// - `escape` → `[escape, escape2]`
/// - anything else → unchanged
pub fn escape(input: &[u8], params: &EscapeParams) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        if b == params.victim {
            out.push(params.escape);
            out.push(params.substitute);
        } else if b == params.escape {
            out.push(params.escape);
            out.push(params.escape2);
        } else {
            out.push(b);
        }
    }
    out
}

/// Inverts [`escape`]. Fails with [`PatchError::CorruptPatch`] if an `escape`
/// byte is followed by anything other than `substitute` or `escape2`, or if
/// the input ends on a bare `escape` byte with no pair.
pub fn unescape(input: &[u8], params: &EscapeParams) -> Result<Vec<u8>, PatchError> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b == params.escape {
            let pair = input.get(i + 1).ok_or_else(|| {
                PatchError::CorruptPatch("escape byte at end of buffer with no pair".to_owned())
            })?;
            if *pair == params.substitute {
                out.push(params.victim);
            } else if *pair == params.escape2 {
                out.push(params.escape);
            } else {
                return Err(PatchError::CorruptPatch(format!(
                    "escape byte followed by invalid pair byte {}",
                    pair
                )));
            }
            i += 2;
        } else {
            out.push(b);
            i += 1;
        }
    }
    Ok(out)
}

/// Searches over candidate `(substitute, escape, escape2)` triples for the
/// one minimizing `count(B == victim) + count(B == escape)` — the number of
/// two-byte expansions `escape(B, _)` will produce — subject to the
/// pairwise-distinctness invariants. Also fills in `estimated_new_size`.
///
/// `victim` is fixed by the caller (the generator always uses `0x00`, per
/// `ARPatcher.cpp`'s `findBestEscape(oldFile, 0)`).
pub fn find_best_escape(buffer: &[u8], victim: u8) -> EscapeParams {
    let mut counts = [0u64; 256];
    for &b in buffer {
        counts[b as usize] += 1;
    }

    let victim_count = counts[victim as usize];

    // Candidate `escape` bytes ranked by ascending frequency (any byte other
    // than `victim` is eligible); `substitute`/`escape2` just need to be
    // distinct from `victim`/`escape` respectively, so pick the two least
    // frequent remaining bytes to minimize the chance they collide with
    // commonly occurring data (this does not affect correctness, only which
    // of several equally-minimal triples is chosen).
    let mut by_freq: Vec<u8> = (0u16..256).map(|b| b as u8).filter(|&b| b != victim).collect();
    by_freq.sort_by_key(|&b| counts[b as usize]);

    let escape = by_freq[0];
    let substitute = by_freq.iter().copied().find(|&b| b != escape).unwrap();
    let escape2 = by_freq
        .iter()
        .copied()
        .find(|&b| b != escape && b != substitute)
        .unwrap();

    let expansions = victim_count + counts[escape as usize];
    let estimated_new_size = buffer.len() as u64 + expansions;

    EscapeParams {
        victim,
        substitute,
        escape,
        escape2,
        estimated_new_size,
    }
}

/// Recomputes `estimated_new_size` for `buffer` without altering the chosen
/// byte values — used when estimating the escaped size of a sub-buffer (e.g.
/// a single section) using escape parameters already fixed for the whole
/// file.
pub fn recalculate_estimated_new_size(buffer: &[u8], params: &mut EscapeParams) {
    let expansions = buffer
        .iter()
        .filter(|&&b| b == params.victim || b == params.escape)
        .count() as u64;
    params.estimated_new_size = buffer.len() as u64 + expansions;
}
