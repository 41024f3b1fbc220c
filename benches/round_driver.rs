//! Criterion benchmarks for the round driver and end-to-end grammar build.
//!
//! Run with:
//!   cargo bench --bench round_driver

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Returns compressible synthetic text of the given size: a repeating
/// lorem-ipsum phrase, so the benchmark reflects the grammar builder's
/// repeat-detection rather than raw I/O throughput.
fn synthetic_text(size: usize) -> Vec<u8> {
    const LOREM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. ";
    let mut out = Vec::with_capacity(size);
    while out.len() < size {
        out.extend_from_slice(LOREM);
    }
    out.truncate(size);
    out
}

fn bench_build_grammar(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_grammar");

    for &size in &[16 * 1024usize, 256 * 1024] {
        let text = synthetic_text(size);
        group.throughput(Throughput::Bytes(size as u64));

        for &threads in &[1usize, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("threads_{threads}"), size),
                &text,
                |b, text| {
                    b.iter(|| lc_gram::compress(text, b'\n', threads, 1).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let text = synthetic_text(64 * 1024);
    let grammar = lc_gram::compress(&text, b'\n', 4, 1).unwrap();

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("full_expand", |b| {
        b.iter(|| lc_gram::decompress(&grammar));
    });
    group.finish();
}

criterion_group!(benches, bench_build_grammar, bench_decompress);
criterion_main!(benches);
