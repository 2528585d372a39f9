//! Benchmarks for Karplus-Strong plucks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fretsynth::dsp::karplus::pluck;
use rand::{rngs::StdRng, SeedableRng};

pub fn bench_karplus(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/karplus");
    let mut rng = StdRng::seed_from_u64(1);

    // Low E to high E at the 12th fret; a note is synthesized whole
    for &frequency in &[82.41f32, 329.63, 659.26] {
        group.bench_with_input(
            BenchmarkId::new("pluck_3s", frequency as u32),
            &frequency,
            |b, &frequency| {
                b.iter(|| {
                    pluck(
                        &mut rng,
                        black_box(frequency),
                        48_000.0,
                        black_box(3.0),
                        0.8,
                        0.996,
                    )
                })
            },
        );
    }

    group.finish();
}
