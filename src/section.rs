//! Partitioning of the escaped old file into sections (component B).
//!
//! Grounded on `ARPatcher.cpp`'s `treesFromEscapedFile`: splits the escaped
//! old file into contiguous, non-overlapping, gap-free ranges no larger than
//! `max_single_buffer_size`, building one suffix tree per range so the whole
//! old file never needs a single suffix tree sized to its full length.

use rayon::prelude::*;

use crate::cst::suffix_automaton::SuffixAutomaton;

/// One contiguous range of the escaped old file, together with the suffix
/// tree built over its bytes.
pub struct Section {
    /// Index of this section among all sections of the old file, in
    /// ascending offset order.
    pub index: usize,
    /// Byte offset, within the escaped old file, where this section begins.
    pub offset: usize,
    /// The section's raw bytes.
    pub data: Vec<u8>,
    /// Suffix tree built over `data`.
    pub cst: SuffixAutomaton,
}

/// Splits `old_escaped` into sections of at most `max_single_buffer_size`
/// bytes each (the final section may be shorter), building each section's
/// suffix tree in parallel since construction is independent per section.
///
/// `max_single_buffer_size` must be at least 1 whenever `old_escaped` is
/// non-empty; an empty `old_escaped` always produces zero sections,
/// regardless of `max_single_buffer_size`.
pub fn build_sections(old_escaped: &[u8], max_single_buffer_size: usize) -> Vec<Section> {
    if old_escaped.is_empty() {
        return Vec::new();
    }
    assert!(max_single_buffer_size > 0, "max_single_buffer_size must be positive");

    let mut offsets = Vec::new();
    let mut offset = 0usize;
    while offset < old_escaped.len() {
        let end = (offset + max_single_buffer_size).min(old_escaped.len());
        offsets.push((offset, end));
        offset = end;
    }

    offsets
        .into_par_iter()
        .enumerate()
        .map(|(index, (begin, end))| {
            let data = old_escaped[begin..end].to_vec();
            let cst = SuffixAutomaton::build(&data);
            Section {
                index,
                offset: begin,
                data,
                cst,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_no_sections() {
        let sections = build_sections(&[], 16);
        assert!(sections.is_empty());
    }

    #[test]
    fn empty_input_with_zero_buffer_size_does_not_panic() {
        let sections = build_sections(&[], 0);
        assert!(sections.is_empty());
    }

    #[test]
    fn exact_multiple_splits_evenly() {
        let data = vec![1u8; 32];
        let sections = build_sections(&data, 16);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].offset, 0);
        assert_eq!(sections[0].data.len(), 16);
        assert_eq!(sections[1].offset, 16);
        assert_eq!(sections[1].data.len(), 16);
    }

    #[test]
    fn remainder_forms_shorter_final_section() {
        let data = vec![1u8; 40];
        let sections = build_sections(&data, 16);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[2].data.len(), 8);
        assert_eq!(sections[2].offset, 32);
    }

    #[test]
    fn sections_are_contiguous_and_gap_free() {
        let data: Vec<u8> = (0u8..100).collect();
        let sections = build_sections(&data, 30);
        let mut reconstructed = Vec::new();
        for s in &sections {
            assert_eq!(s.offset, reconstructed.len());
            reconstructed.extend_from_slice(&s.data);
        }
        assert_eq!(reconstructed, data);
    }

    #[test]
    fn indices_are_ascending_by_offset() {
        let data = vec![0u8; 100];
        let sections = build_sections(&data, 25);
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn single_section_when_buffer_size_covers_whole_input() {
        let data = vec![9u8; 10];
        let sections = build_sections(&data, 1024);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].data, data);
    }
}
