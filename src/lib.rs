//! A binary differencing and patch-application toolkit: generates a compact
//! index file describing how to rebuild a new file from an old one, and
//! reconstructs the new file from that index plus the old file.
//!
//! See the `patcher` and `applier` binaries for the CLI surface.

pub mod cli;
pub mod config;
pub mod cst;
pub mod engine;
pub mod error;
pub mod escape;
pub mod file;
pub mod patch;
pub mod reconstruct;
pub mod section;
pub mod verify;
