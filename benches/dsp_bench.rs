//! Benchmarks for DSP primitives and real-world scenarios.
//!
//! Run with: cargo bench
//!
//! Per-block stages (filter, shaper, tone graph) run on the audio thread and
//! must finish well within the block deadline. Plucks and strums run on the
//! scheduling thread when a request arrives, so their cost is request latency.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (pluck, filter, waveshaper)
//!   - scenarios/*  Full tone graphs and whole strums through the engine

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_karplus,
    dsp::bench_filter,
    dsp::bench_distortion,
    // Real-world scenarios
    scenarios::bench_tone,
    scenarios::bench_strum,
);
criterion_main!(benches);
