// Purpose: Fretboard pitch, tone/strum presets and note realization
// This layer sits between the schedulers (what to play) and the sinks (where it sounds)

pub mod frequency;
pub mod presets;
pub mod voice;

pub use frequency::{OpenStringTuning, Tuning};
pub use presets::{StrumPattern, StrumPreset, TonePreset};
pub use voice::NoteRealizer;
