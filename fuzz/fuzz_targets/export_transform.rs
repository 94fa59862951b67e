//! Fuzz target for the transformer and CSV writer.
//!
//! Inputs that parse as an export are pushed through the transformer in
//! both projection modes; successful tables are written to CSV. Errors are
//! expected, panics are not.
//!
//! Run with:
//!   cargo +nightly fuzz run export_transform

#![no_main]

use labelflat::output::io_csv::to_csv_string;
use labelflat::record::io_json::from_json_slice;
use labelflat::transform::{transform_document, ProjectionMode, TransformOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(document) = from_json_slice(data) else {
        return;
    };

    for projection in [ProjectionMode::Permissive, ProjectionMode::Strict] {
        let options = TransformOptions {
            projection,
            ..Default::default()
        };
        if let Ok(output) = transform_document(&document, &options) {
            let _ = to_csv_string(&output.table);
        }
    }
});
