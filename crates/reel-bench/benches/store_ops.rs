//! Criterion micro-benchmarks for replay parts and views.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use reel_bench::{mock_registry, recording};
use reel_cache::WriteableCache;
use reel_store::{page_in, page_out, PacketTimeline, ReplayPart};
use reel_test_utils::MockPacket;

/// Benchmark: add 1K packets in arrival order.
fn bench_add_in_order(c: &mut Criterion) {
    c.bench_function("part_add_1k_in_order", |b| {
        b.iter(|| {
            let part = ReplayPart::new();
            for t in 0..1_000 {
                part.add(t, MockPacket::keep_alive(t as u64)).unwrap();
            }
            black_box(part.size());
        });
    });
}

/// Benchmark: iterate a 30-second view of a 10K-packet recording.
fn bench_view_iterate(c: &mut Criterion) {
    let part = recording(10_000, 600_000);
    let view = part.view_range(60_000, 90_000).unwrap();

    c.bench_function("view_iterate_30s", |b| {
        b.iter(|| black_box(view.cursor().count()));
    });
}

/// Benchmark: copy a window out of a 10K-packet recording.
fn bench_copy_range(c: &mut Criterion) {
    let part = recording(10_000, 600_000);

    c.bench_function("part_copy_range_30s", |b| {
        b.iter(|| black_box(part.copy_range(60_000, 90_000).unwrap().size()));
    });
}

/// Benchmark: page a 1K-packet part out and back in.
fn bench_page_roundtrip(c: &mut Criterion) {
    let registry = mock_registry();
    let part = recording(1_000, 60_000);

    c.bench_function("page_roundtrip_1k", |b| {
        b.iter(|| {
            let mut cache = WriteableCache::new(Vec::new());
            let refs = page_out(&part, &registry, &mut cache).unwrap();
            let bytes = cache.into_inner();
            let restored = ReplayPart::new();
            black_box(page_in(&restored, &refs, &registry, &bytes).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_add_in_order,
    bench_view_iterate,
    bench_copy_range,
    bench_page_roundtrip
);
criterion_main!(benches);
