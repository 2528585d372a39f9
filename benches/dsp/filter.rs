//! Benchmarks for the state-variable lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fretsynth::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Tone lowpass, Q = 1
        let mut filter = SVFilter::lowpass(1_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });

        // Resonant lowpass
        let mut filter = SVFilter::with_q(1_000.0, 4.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_q4", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
