use std::sync::Arc;

use crate::{
    dsp::distortion::DistortionCurve,
    graph::{
        amplify::GainNode,
        distortion::DistortionNode,
        extensions::NodeExt,
        filter::FilterNode,
        node::{GraphNode, RenderCtx},
        through::Through,
    },
    synth::presets::TonePreset,
};

/*
Per-Note Tone Graph
===================

Every note gets its own small signal chain, built when the note is scheduled:

  clean:      [pluck] ──→ [lowpass] ──────────────────────────────────────→ master
  distorted:  [pluck] ──→ [lowpass] ──→ [shaper 4x] ──→ [lowpass] ──→ [gain] ──→ master

Stage 1, tone lowpass (Q = 1):
    cutoff = min(frequency * filter_multiplier, filter_max_hz)

Stage 2, drive (only when the distortion amount is above zero):
    shaper       cached curve for the amount, 4x oversampled
    post filter  8000 Hz at amount 0 down to 4000 Hz at amount 100, Q = 1
    makeup gain  1.0 at amount 0 down to 0.7 at amount 100

With the amount at zero the drive stage does not exist at all; the tone
lowpass feeds the master output directly.
*/

/// Post-distortion lowpass cutoff at amount 0.
pub const DRIVE_CUTOFF_MAX_HZ: f32 = 8_000.0;
/// Post-distortion lowpass cutoff at amount 100.
pub const DRIVE_CUTOFF_MIN_HZ: f32 = 4_000.0;
/// Makeup gain at amount 100 (it is 1.0 at amount 0).
pub const MAKEUP_GAIN_MIN: f32 = 0.7;

/// Compensating lowpass cutoff for a distortion amount (0 - 100).
pub fn drive_cutoff(amount: f32) -> f32 {
    let t = amount.clamp(0.0, 100.0) / 100.0;
    DRIVE_CUTOFF_MAX_HZ - (DRIVE_CUTOFF_MAX_HZ - DRIVE_CUTOFF_MIN_HZ) * t
}

/// Makeup gain for a distortion amount (0 - 100).
pub fn makeup_gain(amount: f32) -> f32 {
    let t = amount.clamp(0.0, 100.0) / 100.0;
    1.0 - (1.0 - MAKEUP_GAIN_MIN) * t
}

type DriveChain = Through<Through<DistortionNode, FilterNode>, GainNode>;

/// Waveshaper, compensating lowpass and makeup gain.
pub struct DriveStage {
    chain: DriveChain,
    amount: f32,
    cutoff_hz: f32,
    makeup_gain: f32,
}

impl DriveStage {
    fn new(curve: Arc<DistortionCurve>) -> Self {
        let amount = curve.amount();
        let cutoff_hz = drive_cutoff(amount);
        let makeup_gain = makeup_gain(amount);
        let chain = DistortionNode::new(curve)
            .through(FilterNode::lowpass(cutoff_hz))
            .through(GainNode::new(makeup_gain));

        Self {
            chain,
            amount,
            cutoff_hz,
            makeup_gain,
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn makeup_gain(&self) -> f32 {
        self.makeup_gain
    }
}

/// The complete chain for one note.
pub struct ToneGraph {
    lowpass: FilterNode,
    drive: Option<DriveStage>,
}

impl ToneGraph {
    pub fn cutoff_hz(&self) -> f32 {
        self.lowpass.cutoff_hz()
    }

    pub fn drive(&self) -> Option<&DriveStage> {
        self.drive.as_ref()
    }
}

impl GraphNode for ToneGraph {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.lowpass.render_block(out, ctx);
        if let Some(drive) = &mut self.drive {
            drive.chain.render_block(out, ctx);
        }
    }

    fn reset(&mut self) {
        self.lowpass.reset();
        if let Some(drive) = &mut self.drive {
            drive.chain.reset();
        }
    }
}

/// Assembles a [`ToneGraph`] from the active tone preset and distortion setting.
pub struct ToneGraphBuilder<'a> {
    tone: &'a TonePreset,
    curve: Option<Arc<DistortionCurve>>,
}

impl<'a> ToneGraphBuilder<'a> {
    pub fn new(tone: &'a TonePreset) -> Self {
        Self { tone, curve: None }
    }

    /// Insert the drive stage using `curve`. `None` (amount zero) bypasses it.
    pub fn distortion(mut self, curve: Option<Arc<DistortionCurve>>) -> Self {
        self.curve = curve.filter(|curve| curve.amount() > 0.0);
        self
    }

    pub fn build(&self, frequency: f32) -> ToneGraph {
        let cutoff = (frequency * self.tone.filter_multiplier).min(self.tone.filter_max_hz);

        ToneGraph {
            lowpass: FilterNode::lowpass(cutoff),
            drive: self.curve.clone().map(DriveStage::new),
        }
    }
}
