//! Composable building blocks for the per-note tone chain.
//!
//! Graph nodes wrap the low-level DSP primitives with a common block-based
//! interface so the tone builder can string them together with `.through()`.
//! Each scheduled note owns its own graph; the mixer runs it while the note
//! plays.

/// Fixed gain stage.
pub mod amplify;
/// Oversampled waveshaping node.
pub mod distortion;
/// Fluent combinators (`.through()`).
pub mod extensions;
/// Lowpass filter node.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// Tone graph assembly from presets and distortion settings.
pub mod tone;

pub use node::{GraphNode, RenderCtx};
pub use tone::{ToneGraph, ToneGraphBuilder};
