//! Benchmarks for waveshaping distortion.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use fretsynth::dsp::distortion::{DistortionCurve, Waveshaper};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    // Rebuilding the table is what a distortion change costs
    group.bench_function("curve_build", |b| {
        b.iter(|| DistortionCurve::new(black_box(50.0)))
    });

    let curve = Arc::new(DistortionCurve::new(50.0));

    for &size in BLOCK_SIZES {
        // Generate a test signal (sine-like values)
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        // 4x oversampled shaper
        let mut shaper = Waveshaper::new(Arc::clone(&curve));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("waveshaper", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shaper.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
