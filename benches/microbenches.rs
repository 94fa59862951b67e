//! Criterion microbenches for labelflat loading, transforming and writing.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Export JSON parsing (from_json_slice)
//! - Record flattening and row expansion (transform_document)
//! - CSV writing (to_csv_string)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use labelflat::output::io_csv::to_csv_string;
use labelflat::record::io_json::{from_json_slice, from_json_str};
use labelflat::transform::{transform_document, ExclusionSet, TransformOptions};

// Include the test fixture at compile time (no file I/O during benchmark)
const EXPORT_FIXTURE: &str = include_str!("../tests/fixtures/sample_export.json");

/// Builds a larger synthetic export so per-row costs dominate.
fn synthetic_export(images: usize, labels_per_image: usize) -> String {
    let mut out = String::from("{\"images\":[");
    for i in 0..images {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"image_name\":\"img_{i}.jpg\",\"dataset_name\":\"rating_{}\",\"width\":1920,\
             \"height\":1080,\"tags\":[\"t\"],\"labels\":[",
            i % 6
        ));
        for j in 0..labels_per_image {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&format!(
                "{{\"id\":\"l{i}_{j}\",\"class_name\":\"Bird\",\"bbox\":[{j},{j},100,100],\
                 \"attributes\":{{\"sex\":\"F\",\"foot\":\"left\"}},\"Bird - Individual\":\"B{j}\"}}"
            ));
        }
        out.push_str("]}");
    }
    out.push_str("]}");
    out
}

/// Benchmark export parsing from bytes.
fn bench_parse(c: &mut Criterion) {
    let bytes = EXPORT_FIXTURE.as_bytes();
    let mut group = c.benchmark_group("export_parse");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("from_json_slice", |b| {
        b.iter(|| {
            let doc = from_json_slice(black_box(bytes)).unwrap();
            black_box(doc)
        })
    });

    group.finish();
}

/// Benchmark the transformer on a synthetic export.
///
/// Parsing happens once outside the timed loop.
fn bench_transform(c: &mut Criterion) {
    let json = synthetic_export(500, 8);
    let doc = from_json_str(&json).unwrap();
    let options = TransformOptions {
        exclude: ExclusionSet::parse("id"),
        ..Default::default()
    };

    let mut group = c.benchmark_group("transform");
    group.throughput(Throughput::Elements(4000));

    group.bench_function("transform_document", |b| {
        b.iter(|| {
            let output = transform_document(black_box(&doc), black_box(&options)).unwrap();
            black_box(output)
        })
    });

    group.finish();
}

/// Benchmark CSV writing of an already transformed table.
fn bench_write_csv(c: &mut Criterion) {
    let json = synthetic_export(500, 8);
    let doc = from_json_str(&json).unwrap();
    let table = transform_document(&doc, &TransformOptions::default())
        .unwrap()
        .table;

    let mut group = c.benchmark_group("csv_write");
    group.throughput(Throughput::Elements(table.len() as u64));

    group.bench_function("to_csv_string", |b| {
        b.iter(|| {
            let csv = to_csv_string(black_box(&table)).unwrap();
            black_box(csv)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_transform, bench_write_csv);
criterion_main!(benches);
