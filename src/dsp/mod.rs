//! Low-level DSP primitives used by the tone graph and the note renderer.
//!
//! These components are plain functions and small state structs with no
//! knowledge of scheduling or presets. They stay focused on the signal math
//! so the graph and synth layers can compose them.

/// Gain and summing helpers.
pub mod amplify;
/// Waveshaping transfer curves, their cache and the oversampled shaper.
pub mod distortion;
/// Linear attack/release fades applied to a rendered note.
pub mod envelope;
/// State-variable lowpass filter.
pub mod filter;
/// Fractional-delay Karplus-Strong plucked string.
pub mod karplus;

pub use distortion::{DistortionCurve, DistortionCurveCache};
pub use envelope::FadeEnvelope;
