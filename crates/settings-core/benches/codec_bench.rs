//! Criterion benchmarks for the properties codec.
//!
//! Settings files are decoded once at startup and encoded once at shutdown,
//! so these numbers mostly guard against accidental quadratic behaviour on
//! large files.
//!
//! Run with:
//! ```bash
//! cargo bench --package settings-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use settings_core::{decode_properties, encode_properties, PropertyMap, INSTALLER_VERSION};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_map(entries: usize) -> PropertyMap {
    let mut map = PropertyMap::new();
    map.insert(INSTALLER_VERSION.to_string(), "2.4.1".to_string());
    for i in 0..entries {
        map.insert(
            format!("app.module{i}.path"),
            format!("/opt/app/modules/{i}: enabled=true # café"),
        );
    }
    map
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_properties");
    for size in [10usize, 100, 1_000] {
        let map = make_map(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| encode_properties(black_box(map), Some("installer settings")))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_properties");
    for size in [10usize, 100, 1_000] {
        let text = encode_properties(&make_map(size), Some("installer settings"));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| decode_properties(black_box(text)).expect("decode"))
        });
    }
    group.finish();
}

fn bench_decode_continuations(c: &mut Criterion) {
    let text: String = (0..200)
        .map(|i| format!("list{i} = a,\\\n    b,\\\n    c\n"))
        .collect();
    c.bench_function("decode_properties/continuations", |b| {
        b.iter(|| decode_properties(black_box(&text)).expect("decode"))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_continuations);
criterion_main!(benches);
