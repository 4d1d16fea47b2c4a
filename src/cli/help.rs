//! Usage text for both binaries, printed to stderr gated by the crate's
//! display-level macros.
//!
//! Grounded on `ARPatcher.cpp`'s `printUsage()` and `ARPatchApplier.cpp`'s
//! inline usage/contact-info printing in `main()`.

use crate::displaylevel;

pub fn print_patcher_usage(program: &str) {
    displaylevel!(
        1,
        "usage:\n  \
         {program} -generateIndexFile <oldFile> <newFile> <indexOut> <maxBufMiB> <minChunkFactor>\n  \
         {program} -buildNewFile <indexFile>\n  \
         {program} -buildNewFileLow <indexFile> <maxBufferBytes>\n",
        program = program,
    );
}

pub fn print_applier_usage(program: &str) {
    displaylevel!(1, "usage:\n  {program} <indexFile> [indexFile...]\n", program = program,);
}
