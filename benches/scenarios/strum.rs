//! Benchmarks for whole strums through the engine.
//!
//! A strum synthesizes all of its notes when it is requested, so this is the
//! latency between asking for a chord and having it queued.

use std::hint::black_box;

use criterion::Criterion;
use fretsynth::{
    io::OfflineSink,
    sequencing::{ChordShape, StrumDirection},
    Engine, EngineConfig,
};

pub fn bench_strum(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/strum");
    let chord = ChordShape::from_frets([0, 2, 2, 1, 0, 0]);

    for &(name, distortion) in &[("e_major_clean", 0.0f32), ("e_major_driven", 60.0)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let config = EngineConfig {
                    distortion,
                    seed: Some(3),
                    ..EngineConfig::default()
                };
                let mut engine = Engine::new(OfflineSink::new(48_000.0), config)
                    .expect("default presets exist");
                black_box(engine.play_chord(&chord, StrumDirection::Down))
            })
        });
    }

    // Rendering one second of a six-string strum
    group.bench_function("render_1s", |b| {
        b.iter(|| {
            let mut engine = Engine::new(OfflineSink::new(48_000.0), EngineConfig::default())
                .expect("default presets exist");
            engine.initialize().expect("offline sink starts");
            engine.play_chord(&chord, StrumDirection::Down);
            black_box(engine.sink_mut().render_seconds(1.0))
        })
    });

    group.finish();
}
