//! Benchmarks for packfs rendering.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use packfs::packer::directory::c_string_literal;
use packfs::packer::table::{DEFAULT_COLUMNS, ascii_preview, render_table};

/// Benchmark byte table rendering for text-like and binary payloads.
fn bench_render_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_table");

    let text = include_str!("../src/packer/mod.rs").as_bytes();
    let binary: Vec<u8> = (0..64 * 1024).map(|i| (i * 31 % 251) as u8).collect();

    for (label, payload) in [("source_text", text), ("binary_64k", binary.as_slice())] {
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::new(label, payload.len()), &payload, |b, data| {
            b.iter(|| std::hint::black_box(render_table("v0", data, DEFAULT_COLUMNS)))
        });
    }

    group.finish();
}

/// Benchmark the per-row comment rendering.
fn bench_ascii_preview(c: &mut Criterion) {
    let row = b"<html>\\\x00\x01\xffabc";
    c.bench_function("ascii_preview", |b| {
        b.iter(|| std::hint::black_box(ascii_preview(row)))
    });
}

/// Benchmark name literal escaping.
fn bench_c_string_literal(c: &mut Criterion) {
    let name = "/static/css/some \"quoted\" path?/with\\backslash/\u{e9}t\u{e9}.css".as_bytes();
    c.bench_function("c_string_literal", |b| {
        b.iter(|| std::hint::black_box(c_string_literal(name)))
    });
}

criterion_group!(
    benches,
    bench_render_table,
    bench_ascii_preview,
    bench_c_string_literal,
);
criterion_main!(benches);
