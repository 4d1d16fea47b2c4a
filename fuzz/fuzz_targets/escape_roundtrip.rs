//! Fuzzes the escape codec: for any input buffer, escaping then unescaping
//! must recover the original bytes exactly, and the escaped output must
//! never contain the victim byte.
#![no_main]

use libfuzzer_sys::fuzz_target;
use patchkit::escape::{escape, find_best_escape, unescape};

fuzz_target!(|data: &[u8]| {
    let params = find_best_escape(data, 0);
    let escaped = escape(data, &params);
    assert!(!escaped.contains(&params.victim));
    let restored = unescape(&escaped, &params).expect("escape output must always unescape cleanly");
    assert_eq!(restored, data);
});
