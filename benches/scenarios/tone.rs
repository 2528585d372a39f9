//! Benchmarks for complete per-note tone graphs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use fretsynth::dsp::distortion::DistortionCurveCache;
use fretsynth::graph::{GraphNode, RenderCtx, ToneGraphBuilder};
use fretsynth::synth::TonePreset;

use crate::BLOCK_SIZES;

pub fn bench_tone(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/tone");
    let ctx = RenderCtx::from_freq(48_000.0, 110.0, 0.8); // A string
    let mut curves = DistortionCurveCache::new();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        let mut buffer = input.clone();

        // === CLEAN ===
        // lowpass only; the common case
        let mut clean = ToneGraphBuilder::new(&TonePreset::ACOUSTIC).build(110.0);
        group.bench_with_input(BenchmarkId::new("clean", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                clean.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // === DRIVEN ===
        // lowpass → 4x shaper → lowpass → makeup gain
        let mut driven = ToneGraphBuilder::new(&TonePreset::ELECTRIC)
            .distortion(curves.curve(70.0))
            .build(110.0);
        group.bench_with_input(BenchmarkId::new("driven", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                driven.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
