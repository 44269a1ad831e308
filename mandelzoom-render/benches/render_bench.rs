use criterion::{criterion_group, criterion_main, Criterion};

use mandelzoom_core::Viewport;
use mandelzoom_render::{compute_grid, compute_grid_with_bands, ColorCache, FrameEngine};

fn bench_full_frame(c: &mut Criterion) {
    let mut engine = FrameEngine::default();

    c.bench_function("frame_640x480_500iter", |b| {
        b.iter(|| engine.compute_frame(640, 480, &Viewport::DEFAULT, 500, false));
    });
}

fn bench_band_counts(c: &mut Criterion) {
    let viewport = Viewport::new(-0.8, -0.7, 0.05, 0.15).unwrap();
    let mut group = c.benchmark_group("grid_256x256_1000iter");
    for bands in [1u32, 8, 85, 256] {
        group.bench_function(format!("{bands}_bands"), |b| {
            b.iter(|| compute_grid_with_bands(256, 256, 1000, &viewport, bands));
        });
    }
    group.finish();
}

fn bench_colorize(c: &mut Criterion) {
    let grid = compute_grid(640, 480, 2000, &Viewport::DEFAULT);
    let mut cache = ColorCache::new();

    c.bench_function("colorize_640x480_warm", |b| {
        b.iter(|| cache.colorize(&grid, false));
    });
    c.bench_function("colorize_640x480_cold", |b| {
        b.iter(|| ColorCache::new().colorize(&grid, false));
    });
}

criterion_group!(benches, bench_full_frame, bench_band_counts, bench_colorize);
criterion_main!(benches);
