//! Applier binary: applies one or more index files, reconstructing each
//! index's new file via streaming reconstruction with a fixed buffer size.
//!
//! Grounded on `ARPatchApplier.cpp`'s `main()`: resolves `oldFileName`/
//! `newFileName` relative to the index file's own parent directory, streams
//! reconstruction through a fixed-size buffer, and continues past a
//! per-index-file failure rather than aborting the whole run (logging
//! "This index file will be skipped." for every file that fails).

use std::io::Write;
use std::path::Path;

use patchkit::cli::args::parse_applier_args;
use patchkit::cli::help::print_applier_usage;
use patchkit::config::APPLIER_BUFFER_SIZE;
use patchkit::error::PatchError;
use patchkit::escape::escape;
use patchkit::file::{read_entire_file, resolve_relative};
use patchkit::patch::read_chunks;
use patchkit::reconstruct::write_new_file_content;
use patchkit::{display, displaylevel};

fn apply_one(index_file: &Path) -> Result<(), PatchError> {
    let index_bytes = read_entire_file(index_file)?;
    let patch = read_chunks(&mut &index_bytes[..])?;

    let base_dir = index_file.parent().unwrap_or_else(|| Path::new("."));
    let old_path = resolve_relative(base_dir, &patch.old_file_name);
    let new_path = resolve_relative(base_dir, &patch.new_file_name);

    let old_bytes = read_entire_file(&old_path)?;
    let escaped_old = escape(&old_bytes, &patch.escape_params);

    let dir = new_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_new_file_content(&mut tmp, &escaped_old, &patch, APPLIER_BUFFER_SIZE)?;
    tmp.flush()?;
    tmp.persist(&new_path).map_err(|e| PatchError::Io(e.error))?;

    displaylevel!(1, "applied {} -> {}\n", index_file.display(), new_path.display());
    Ok(())
}

/// Applies every index file in `index_files`, continuing past failures.
/// Returns the number of files that failed to apply.
fn run(index_files: &[std::path::PathBuf]) -> usize {
    let mut failures = 0;
    for index_file in index_files {
        if let Err(e) = apply_one(index_file) {
            display!("error applying {}: {}\n", index_file.display(), e);
            display!("This index file will be skipped.\n");
            failures += 1;
        }
    }
    failures
}

fn main() {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().cloned().unwrap_or_else(|| "applier".to_owned());

    let parsed = match parse_applier_args(&argv[1..]) {
        Ok(p) => p,
        Err(e) => {
            display!("error: {}\n", e);
            print_applier_usage(&program);
            std::process::exit(1);
        }
    };

    let failures = run(&parsed.index_files);
    std::process::exit(if failures > 0 { 2 } else { 0 });
}
