pub mod dsp;
pub mod engine; // Playback context, guard and timed tasks
pub mod graph; // Per-note tone chain nodes
pub mod io; // Audio sinks and settings persistence
pub mod sequencing; // Strum and arpeggio timing
pub mod synth; // Tuning, presets and note realization

pub use engine::{Engine, EngineConfig, EngineError, Playback};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
