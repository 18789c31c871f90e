//! Criterion micro-benchmarks comparing chunked append+flatten against a
//! doubling `Vec` when the final size is unknown up front.

use std::hint::black_box;

use chunkbits_bench::burst_profile;
use chunkbits_core::IntBuffer;
use criterion::{criterion_group, criterion_main, Criterion};

const TOTAL: usize = 1_000_000;

fn bench_chunked_append_flatten(c: &mut Criterion) {
    let parts = burst_profile(1, TOTAL, 16_384);
    c.bench_function("chunked_add_flatten_1m", |b| {
        b.iter(|| {
            let mut buf = IntBuffer::new();
            for part in &parts {
                buf.add(part);
            }
            let mut out = vec![0i32; buf.len()];
            buf.flatten_into(&mut out).unwrap();
            black_box(out.len());
        });
    });
}

fn bench_vec_extend(c: &mut Criterion) {
    let parts = burst_profile(1, TOTAL, 16_384);
    c.bench_function("vec_extend_1m", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            for part in &parts {
                out.extend_from_slice(part);
            }
            black_box(out.len());
        });
    });
}

fn bench_small_bursts(c: &mut Criterion) {
    let parts = burst_profile(2, 100_000, 64);
    c.bench_function("chunked_add_small_bursts_100k", |b| {
        b.iter(|| {
            let mut buf = IntBuffer::new();
            for part in &parts {
                buf.add(part);
            }
            black_box(buf.to_vec().len());
        });
    });
}

criterion_group!(
    benches,
    bench_chunked_append_flatten,
    bench_vec_extend,
    bench_small_bursts
);
criterion_main!(benches);
