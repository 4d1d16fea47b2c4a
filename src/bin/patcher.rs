//! Patcher binary: generates an index file from an (old, new) file pair, or
//! reconstructs a new file from an already-generated index file.
//!
//! Grounded on `ARPatcher.cpp`'s `main()` — mode dispatch over
//! `-generateIndexFile` / `-buildNewFile` / `-buildNewFileLow` — adapted to
//! the teacher's own `run(args) -> i32` + `fn main()` split (`src/main.rs`),
//! which keeps the process-exit-code plumbing out of the dispatch logic
//! itself so it stays unit-testable.

use std::fs;
use std::io::Write;
use std::path::Path;

use patchkit::cli::args::{parse_patcher_args, PatcherCommand};
use patchkit::cli::help::print_patcher_usage;
use patchkit::config::{with_metric_prefix, LOWEST_REFERENCED_BYTES_COUNT, MIB, PATCH_VERSION};
use patchkit::engine::generate_chunks;
use patchkit::error::PatchError;
use patchkit::escape::{escape, find_best_escape, recalculate_estimated_new_size};
use patchkit::file::{read_entire_file, write_file_atomic};
use patchkit::patch::{read_chunks, write_chunks, PatchData};
use patchkit::reconstruct::{get_new_file_content, write_new_file_content};
use patchkit::section::build_sections;
use patchkit::verify::verify;
use patchkit::{display, displaylevel};

const VICTIM_BYTE: u8 = 0;

fn generate_index_file(
    old_file: &Path,
    new_file: &Path,
    index_out: &Path,
    max_buf_mib: i64,
    min_chunk_factor: f64,
) -> Result<(), PatchError> {
    let old_bytes = read_entire_file(old_file)?;
    let new_bytes = read_entire_file(new_file)?;

    let mut escape_params = find_best_escape(&old_bytes, VICTIM_BYTE);
    recalculate_estimated_new_size(&new_bytes, &mut escape_params);

    if escape_params.estimated_new_size > u32::MAX as u64 {
        return Err(PatchError::TooLarge(format!(
            "estimated new file size {} exceeds the wire format's 32-bit length limit",
            escape_params.estimated_new_size
        )));
    }

    let escaped_old = escape(&old_bytes, &escape_params);
    let escaped_new = escape(&new_bytes, &escape_params);

    displaylevel!(
        2,
        "building sections ({} of escaped old file)\n",
        with_metric_prefix(escaped_old.len() as u64)
    );
    // A non-positive maxBufMiB means "entire file in one section".
    let max_buf_bytes = if max_buf_mib <= 0 {
        escaped_old.len().max(1)
    } else {
        (max_buf_mib as u64 * MIB) as usize
    };
    let sections = build_sections(&escaped_old, max_buf_bytes);

    let minimum_chunk_size =
        LOWEST_REFERENCED_BYTES_COUNT.max((escaped_new.len() as f64 * min_chunk_factor).floor() as usize);

    displaylevel!(2, "differencing ({} sections)\n", sections.len());
    let chunks = generate_chunks(&escaped_new, &sections, minimum_chunk_size)?;

    let patch = PatchData {
        version: PATCH_VERSION,
        old_file_name: old_file.to_string_lossy().into_owned(),
        new_file_name: new_file.to_string_lossy().into_owned(),
        escape_params,
        chunks,
    };

    displaylevel!(2, "verifying reconstruction against {}\n", new_file.display());
    verify(&escaped_old, &patch, new_file)?;

    let mut buf = Vec::new();
    write_chunks(&mut buf, &patch)?;
    write_file_atomic(index_out, &buf)?;

    displaylevel!(
        1,
        "wrote {} ({} chunks, {})\n",
        index_out.display(),
        patch.chunks.len(),
        with_metric_prefix(buf.len() as u64)
    );
    Ok(())
}

fn load_patch_and_old_file(index_file: &Path) -> Result<(PatchData, Vec<u8>), PatchError> {
    let index_bytes = read_entire_file(index_file)?;
    let patch = read_chunks(&mut &index_bytes[..])?;

    let base_dir = index_file.parent().unwrap_or_else(|| Path::new("."));
    let old_path = patchkit::file::resolve_relative(base_dir, &patch.old_file_name);
    let old_bytes = read_entire_file(&old_path)?;
    let escaped_old = escape(&old_bytes, &patch.escape_params);

    Ok((patch, escaped_old))
}

fn build_new_file(index_file: &Path) -> Result<(), PatchError> {
    let (patch, escaped_old) = load_patch_and_old_file(index_file)?;
    let base_dir = index_file.parent().unwrap_or_else(|| Path::new("."));
    let new_path = patchkit::file::resolve_relative(base_dir, &patch.new_file_name);

    let result = get_new_file_content(&escaped_old, &patch)?;
    write_file_atomic(&new_path, &result)?;

    displaylevel!(1, "wrote {} ({})\n", new_path.display(), with_metric_prefix(result.len() as u64));
    Ok(())
}

fn build_new_file_low(index_file: &Path, max_buffer_bytes: usize) -> Result<(), PatchError> {
    let (patch, escaped_old) = load_patch_and_old_file(index_file)?;
    let base_dir = index_file.parent().unwrap_or_else(|| Path::new("."));
    let new_path = patchkit::file::resolve_relative(base_dir, &patch.new_file_name);
    let dir = new_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_new_file_content(&mut tmp, &escaped_old, &patch, max_buffer_bytes)?;
    tmp.flush()?;
    tmp.persist(&new_path).map_err(|e| PatchError::Io(e.error))?;

    displaylevel!(1, "wrote {}\n", new_path.display());
    Ok(())
}

/// Dispatches a parsed [`PatcherCommand`], returning the process exit code.
fn run(command: PatcherCommand) -> i32 {
    let result = match command {
        PatcherCommand::GenerateIndexFile {
            old_file,
            new_file,
            index_out,
            max_buf_mib,
            min_chunk_factor,
        } => generate_index_file(&old_file, &new_file, &index_out, max_buf_mib, min_chunk_factor),
        PatcherCommand::BuildNewFile { index_file } => build_new_file(&index_file),
        PatcherCommand::BuildNewFileLow { index_file, max_buffer_bytes } => {
            build_new_file_low(&index_file, max_buffer_bytes)
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            display!("error: {}\n", e);
            2
        }
    }
}

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().cloned().unwrap_or_else(|| "patcher".to_owned());

    let command = match parse_patcher_args(&argv[1..]) {
        Ok(c) => c,
        Err(e) => {
            display!("error: {}\n", e);
            print_patcher_usage(&program);
            std::process::exit(1);
        }
    };

    std::process::exit(run(command));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_build_verify_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let old_path = dir.path().join("old.bin");
        let new_path = dir.path().join("new.bin");
        let index_path = dir.path().join("out.idx");
        let rebuilt_path = dir.path().join("new.bin"); // buildNewFile overwrites in place via new_file_name

        let old_data: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
        let mut new_data = old_data[100..3000].to_vec();
        new_data.extend_from_slice(b"brand new tail content appended here");
        fs::write(&old_path, &old_data).unwrap();
        fs::write(&new_path, &new_data).unwrap();

        generate_index_file(&old_path, &new_path, &index_path, 1, 0.01).unwrap();

        // Move new.bin aside so buildNewFile has to regenerate it from scratch.
        let moved_new = dir.path().join("new.bin.bak");
        fs::rename(&new_path, &moved_new).unwrap();

        build_new_file(&index_path).unwrap();
        let rebuilt = fs::read(&rebuilt_path).unwrap();
        assert_eq!(rebuilt, new_data);
    }

    #[test]
    fn non_positive_max_buf_mib_builds_a_single_section_covering_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let old_path = dir.path().join("old.bin");
        let new_path = dir.path().join("new.bin");
        let index_path = dir.path().join("out.idx");

        let old_data: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
        let new_data = old_data[100..3000].to_vec();
        fs::write(&old_path, &old_data).unwrap();
        fs::write(&new_path, &new_data).unwrap();

        generate_index_file(&old_path, &new_path, &index_path, 0, 0.01).unwrap();
    }
}
