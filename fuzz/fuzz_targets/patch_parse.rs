//! Fuzzes the index-file parser against arbitrary byte streams: it must
//! never panic, only ever return `Ok` or a `PatchError`.
#![no_main]

use libfuzzer_sys::fuzz_target;
use patchkit::patch::read_chunks;

fuzz_target!(|data: &[u8]| {
    let _ = read_chunks(&mut &data[..]);
});
