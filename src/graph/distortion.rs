use std::sync::Arc;

use crate::dsp::distortion::{DistortionCurve, Waveshaper};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Distortion Node
===============

Pushes the note through a waveshaping curve to emulate an overdriven amp. The
curve comes from the engine's DistortionCurveCache, so every note played at
the same amount shares one table.

The node only shapes. Taming the result is left to the stages that follow it
in the tone graph:

    [DistortionNode] ──→ [FilterNode: 8k → 4k Hz] ──→ [GainNode: 1.0 → 0.7]

Both follow the distortion amount, 0 → 100.

Example usage:

  let curve = cache.curve(50.0).expect("non-zero amount");
  let drive = DistortionNode::new(curve)
      .through(FilterNode::lowpass(6_000.0))
      .through(GainNode::new(0.85));
*/

/// Oversampled waveshaping distortion
pub struct DistortionNode {
    shaper: Waveshaper,
    amount: f32,
}

impl DistortionNode {
    pub fn new(curve: Arc<DistortionCurve>) -> Self {
        let amount = curve.amount();
        Self {
            shaper: Waveshaper::new(curve),
            amount,
        }
    }

    /// The distortion amount the curve was built for.
    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.shaper.render(out);
    }

    fn reset(&mut self) {
        self.shaper.reset();
    }
}
