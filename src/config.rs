// config.rs — compile-time constants and verbosity infrastructure.
//
// Migrated from the constants embedded throughout ARPatcher.cpp / Patch.hpp,
// following the teacher's split of `cli/constants.rs` (display-level atomic
// and the `displaylevel!`/`display!`/`displayout!` macro family) and
// `config.rs` (compile-time tunables) into one file, since this crate's
// ambient constants are few enough not to need separate modules.

use std::sync::atomic::{AtomicU32, Ordering};

/// Hard floor below which a match is never accepted as a reference chunk.
///
/// Corresponds to `DataChunk::lowestReferencedBytesCount` in `Patch.hpp`.
pub const LOWEST_REFERENCED_BYTES_COUNT: usize = 32;

/// Initial value of the differencing engine's pessimistic counter.
///
/// Corresponds to `initialPessimisticCounter` in `ARPatcher.cpp`. Negative on
/// purpose: combined with the `max(1, c/2)` update, it gives the first three
/// failed iterations a step of exactly `minimumChunkSize` before geometric
/// growth begins.
pub const INITIAL_PESSIMISTIC_COUNTER: i64 = -3;

/// The only index-file format version this crate reads or writes.
pub const PATCH_VERSION: u32 = 1000;

/// Default buffer size used by the applier's streaming reconstruction.
pub const APPLIER_BUFFER_SIZE: usize = 32 * 1024 * 1024;

/// Number of bytes in one mebibyte, used to scale the `maxBufMiB` CLI argument.
pub const MIB: u64 = 1024 * 1024;

// ── Verbosity infrastructure ─────────────────────────────────────────────────
//
// 0 = silent; 1 = errors only; 2 = normal; 3 = verbose; 4 = trace.
// Mirrors the teacher's `DISPLAY_LEVEL` atomic in `cli/constants.rs`.

/// Crate-wide display level, read by the `displaylevel!` macro.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Print to stdout unconditionally — equivalent to C `DISPLAYOUT(...)`.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr unconditionally.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr only when the current display level is at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::config::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Formats `size` with a metric suffix (G/M/k), matching
/// `printWithMetrixPrefix` in `ARPatcher.cpp`.
pub fn with_metric_prefix(size: u64) -> String {
    if size >= 1_000_000_000 {
        format!("{:.2}G", size as f64 / 1_000_000_000.0)
    } else if size >= 1_000_000 {
        format!("{:.2}M", size as f64 / 1_000_000.0)
    } else if size >= 1_000 {
        format!("{:.2}k", size as f64 / 1_000.0)
    } else {
        size.to_string()
    }
}
