//! Parses the positional mode-string CLI surface spec.md §6 defines for the
//! patcher and applier binaries.
//!
//! Grounded on `ARPatcher.cpp`'s `main()` (mode dispatch via
//! `::tolower`-normalized string comparison against `-generateindexfile` /
//! `-buildnewfile` / `-buildnewfilelow`) and `ARPatchApplier.cpp`'s `main()`
//! (one or more index file paths, applied in turn). Uses `anyhow`, not the
//! crate's own [`crate::error::PatchError`], for the same reason the
//! teacher's own `cli::args::parse_args` does: usage errors never cross the
//! library boundary, they only ever reach a human at the CLI.

use std::path::PathBuf;

use anyhow::{anyhow, bail};

/// One parsed invocation of the patcher binary.
#[derive(Debug, Clone, PartialEq)]
pub enum PatcherCommand {
    GenerateIndexFile {
        old_file: PathBuf,
        new_file: PathBuf,
        index_out: PathBuf,
        /// Raw, unresolved `maxBufMiB` argument. A value `<= 0` means
        /// "entire file in one section" per spec.md §6; resolving that
        /// against the old file's actual length happens where the old
        /// file's bytes are available, not here.
        max_buf_mib: i64,
        min_chunk_factor: f64,
    },
    BuildNewFile { index_file: PathBuf },
    BuildNewFileLow { index_file: PathBuf, max_buffer_bytes: usize },
}

/// One parsed invocation of the applier binary: one or more index files to
/// apply in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplierArgs {
    pub index_files: Vec<PathBuf>,
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Parses `args` (the program's arguments, excluding argv[0]) into a
/// [`PatcherCommand`].
pub fn parse_patcher_args(args: &[String]) -> anyhow::Result<PatcherCommand> {
    let mode = args.first().ok_or_else(|| anyhow!("missing mode argument"))?;

    if eq_ignore_case(mode, "-generateIndexFile") {
        let [old_file, new_file, index_out, max_buf_mib, min_chunk_factor] = match args.get(1..6) {
            Some(rest) if rest.len() == 5 => [
                rest[0].clone(),
                rest[1].clone(),
                rest[2].clone(),
                rest[3].clone(),
                rest[4].clone(),
            ],
            _ => bail!(
                "usage: -generateIndexFile <oldFile> <newFile> <indexOut> <maxBufMiB> <minChunkFactor>"
            ),
        };
        let max_buf_mib: i64 = max_buf_mib
            .parse()
            .map_err(|_| anyhow!("maxBufMiB must be an integer, got {:?}", max_buf_mib))?;
        let min_chunk_factor: f64 = min_chunk_factor
            .parse()
            .map_err(|_| anyhow!("minChunkFactor must be a number, got {:?}", min_chunk_factor))?;
        if !(0.0..=1.0).contains(&min_chunk_factor) {
            bail!("minChunkFactor must be within [0, 1], got {}", min_chunk_factor);
        }
        return Ok(PatcherCommand::GenerateIndexFile {
            old_file: PathBuf::from(old_file),
            new_file: PathBuf::from(new_file),
            index_out: PathBuf::from(index_out),
            max_buf_mib,
            min_chunk_factor,
        });
    }

    if eq_ignore_case(mode, "-buildNewFileLow") {
        let index_file = args.get(1).ok_or_else(|| anyhow!("usage: -buildNewFileLow <indexFile> <maxBufferBytes>"))?;
        let max_buffer_bytes = args
            .get(2)
            .ok_or_else(|| anyhow!("usage: -buildNewFileLow <indexFile> <maxBufferBytes>"))?;
        let max_buffer_bytes: usize = max_buffer_bytes
            .parse()
            .map_err(|_| anyhow!("maxBufferBytes must be a non-negative integer, got {:?}", max_buffer_bytes))?;
        return Ok(PatcherCommand::BuildNewFileLow {
            index_file: PathBuf::from(index_file),
            max_buffer_bytes,
        });
    }

    if eq_ignore_case(mode, "-buildNewFile") {
        let index_file = args.get(1).ok_or_else(|| anyhow!("usage: -buildNewFile <indexFile>"))?;
        return Ok(PatcherCommand::BuildNewFile {
            index_file: PathBuf::from(index_file),
        });
    }

    bail!("unrecognized mode {:?}", mode)
}

/// Parses `args` (the program's arguments, excluding argv[0]) into
/// [`ApplierArgs`]: one or more index file paths.
pub fn parse_applier_args(args: &[String]) -> anyhow::Result<ApplierArgs> {
    if args.is_empty() {
        bail!("usage: applier <indexFile> [indexFile...]");
    }
    Ok(ApplierArgs {
        index_files: args.iter().map(PathBuf::from).collect(),
    })
}
