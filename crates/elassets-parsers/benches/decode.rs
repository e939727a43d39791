//! Benchmarks for the binary decoders
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use elassets_parsers::e3d::{format, options};
use elassets_parsers::{CmfDecoder, Decoder, E3dDecoder, E3dVersion, SkinnedMesh, VertexPlan};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{encode_cmf, encode_e3d, sample_static_object, sample_submesh};

/// Benchmark skinned meshes of growing vertex counts
fn bench_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("cmf");
    let decoder = CmfDecoder::new();

    for vertices in [100, 1_000, 10_000] {
        let mesh = SkinnedMesh {
            version: 1000,
            submeshes: vec![sample_submesh(0, vertices, 1, true)],
        };
        let data = encode_cmf(&mesh);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode", vertices), &data, |b, data| {
            b.iter(|| decoder.decode(black_box(data)))
        });
    }

    group.finish();
}

/// Benchmark the packed and full-precision static object layouts
fn bench_static_object(c: &mut Criterion) {
    let mut group = c.benchmark_group("e3d");
    let decoder = E3dDecoder::new();

    let layouts = [
        ("full", options::HAS_NORMAL, 0),
        ("packed", options::HAS_NORMAL | options::HAS_COLOR, format::MASK),
    ];
    for (label, opts, fmt) in layouts {
        let plan = VertexPlan::compile(E3dVersion::V1_1, opts, fmt);
        let data = encode_e3d(&sample_static_object(E3dVersion::V1_1, plan));

        group.bench_with_input(BenchmarkId::new("decode", label), &data, |b, data| {
            b.iter(|| decoder.decode(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mesh, bench_static_object);
criterion_main!(benches);
