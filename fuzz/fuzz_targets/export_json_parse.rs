//! Fuzz target for annotation export parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the export loader,
//! checking for panics, crashes, or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run export_json_parse

#![no_main]

use labelflat::record::io_json::from_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_json_slice(data);
});
