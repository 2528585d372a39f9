//! Real-world scenario benchmarks.
//!
//! These benchmarks model what happens per note and per strum: complete tone
//! chains on the audio thread and whole requests through the engine.

mod strum;
mod tone;

pub use strum::bench_strum;
pub use tone::bench_tone;
