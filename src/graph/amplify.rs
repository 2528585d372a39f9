use crate::{
    dsp::amplify::apply_gain,
    graph::node::{GraphNode, RenderCtx},
};

/// Fixed gain stage.
///
/// Used as the makeup stage after distortion: the waveshaper makes a note
/// sound louder than its peak level suggests, so the gain drops from 1.0 to
/// 0.7 as the distortion amount goes from 0 to 100.
pub struct GainNode {
    gain: f32,
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: gain.max(0.0),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        apply_gain(out, self.gain);
    }
}
