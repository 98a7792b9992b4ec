//! Performance benchmarks for cache-regions
//!
//! This benchmark suite measures:
//! - Region policy resolution against maps of varying size
//! - Key strategy transformation costs
//! - Region get/put round trips on the in-memory client
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use cache_regions::config::{CacheProperties, RegionSettings};
use cache_regions::key::{DefaultKeyStrategy, KeyStrategy, Sha256KeyStrategy};
use cache_regions::{InMemoryClientFactory, RegionCacheProvider};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Property map shaped like a real deployment: cache-wide settings plus a
/// few dozen region overrides.
fn bench_properties(regions: usize) -> CacheProperties {
    let mut props = CacheProperties::new()
        .set("cache.cache_time_seconds", "300")
        .set("cache.clear_supported", "false")
        .set("cache.servers", "cache1:11211 cache2:11211");

    for i in 0..regions {
        props = props
            .set(format!("cache.region_{}.cache_time_seconds", i), "60")
            .set(format!("cache.region_{}.clear_supported", i), "true");
    }
    props
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for regions in [4, 32, 256] {
        let props = bench_properties(regions);

        group.bench_with_input(
            BenchmarkId::new("resolve_overridden", regions),
            &props,
            |b, props| {
                b.iter(|| {
                    RegionSettings::resolve(black_box("region_0"), props)
                        .expect("Failed to resolve")
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("resolve_defaults", regions),
            &props,
            |b, props| {
                b.iter(|| {
                    RegionSettings::resolve(black_box("unconfigured"), props)
                        .expect("Failed to resolve")
                })
            },
        );
    }

    group.finish();
}

fn bench_key_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_strategy");

    let short_key = "users:0:42";
    let long_key = "users:0:".to_string() + &"k".repeat(300);

    group.bench_function("default_passthrough", |b| {
        b.iter(|| DefaultKeyStrategy.generate_key(black_box(short_key)))
    });

    group.bench_function("default_hashing_overlength", |b| {
        b.iter(|| DefaultKeyStrategy.generate_key(black_box(&long_key)))
    });

    group.bench_function("sha256", |b| {
        b.iter(|| Sha256KeyStrategy.generate_key(black_box(short_key)))
    });

    group.finish();
}

fn bench_region_ops(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    let props = bench_properties(4);
    let mut provider = RegionCacheProvider::new(InMemoryClientFactory);
    runtime
        .block_on(provider.start(&props))
        .expect("Failed to start");
    let region = provider
        .build_cache("region_0", &props)
        .expect("Failed to build region");

    let mut group = c.benchmark_group("region_ops");

    group.bench_function("put", |b| {
        b.iter(|| {
            runtime
                .block_on(region.put(black_box("42"), b"alice".to_vec()))
                .expect("Failed to put")
        })
    });

    group.bench_function("get_hit", |b| {
        runtime
            .block_on(region.put("42", b"alice".to_vec()))
            .expect("Failed to put");
        b.iter(|| {
            runtime
                .block_on(region.get(black_box("42")))
                .expect("Failed to get")
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_resolution,
    bench_key_strategies,
    bench_region_ops
);
criterion_main!(benches);
