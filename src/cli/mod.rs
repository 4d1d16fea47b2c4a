//! Command-line argument parsing for the patcher and applier binaries.

pub mod args;
pub mod help;
