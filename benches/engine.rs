//! Benchmarks the differencing engine's throughput over synthetic old/new
//! file pairs of increasing size, mirroring the teacher's per-module
//! criterion benches (`benches/block.rs`, `benches/frame.rs`).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use patchkit::config::LOWEST_REFERENCED_BYTES_COUNT;
use patchkit::engine::generate_chunks;
use patchkit::escape::{escape, find_best_escape};
use patchkit::section::build_sections;

fn synthetic_pair(size: usize) -> (Vec<u8>, Vec<u8>) {
    let old: Vec<u8> = (0u8..=255).cycle().take(size).collect();
    let mut new = old[size / 4..size / 2].to_vec();
    new.extend_from_slice(&old[..size / 4]);
    (old, new)
}

fn bench_generate_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_chunks");
    for &size in &[8 * 1024usize, 64 * 1024, 512 * 1024] {
        let (old, new) = synthetic_pair(size);
        let params = find_best_escape(&old, 0);
        let escaped_old = escape(&old, &params);
        let escaped_new = escape(&new, &params);
        let sections = build_sections(&escaped_old, 64 * 1024);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(generate_chunks(&escaped_new, &sections, LOWEST_REFERENCED_BYTES_COUNT).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate_chunks);
criterion_main!(benches);
