use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Lowpass Filter Node
===================

A plucked string straight out of the delay line is bright and a little
brittle. The tone stage rolls it off with a lowpass whose cutoff follows the
note: a multiple of the fundamental, capped at the preset's ceiling.

    cutoff = min(frequency * filter_multiplier, filter_max_hz)

A second lowpass sits after the waveshaper when distortion is on. Distortion
piles harmonics into the top octaves, and the post filter brings its cutoff
down as the drive goes up.

Example usage:
  let tone = FilterNode::lowpass(2_400.0);
  let post = FilterNode::lowpass(6_000.0).with_q(0.707);
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    /// Lowpass with Q = 1.
    pub fn lowpass(cutoff_hz: f32) -> Self {
        FilterNode {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn with_q(self, q: f32) -> Self {
        FilterNode {
            filter: SVFilter::with_q(self.filter.cutoff_hz, q),
        }
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.filter.q
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowpass_defaults_to_unity_q() {
        let node = FilterNode::lowpass(1_000.0);
        assert_eq!(node.cutoff_hz(), 1_000.0);
        assert_eq!(node.q(), 1.0);
    }

    #[test]
    fn with_q_keeps_cutoff() {
        let node = FilterNode::lowpass(3_000.0).with_q(0.5);
        assert_eq!(node.cutoff_hz(), 3_000.0);
        assert_eq!(node.q(), 0.5);
    }

    #[test]
    fn reset_clears_memory() {
        let ctx = RenderCtx::from_freq(44_100.0, 110.0, 1.0);
        let mut node = FilterNode::lowpass(500.0);
        let mut warm = vec![1.0; 256];
        node.render_block(&mut warm, &ctx);

        node.reset();
        let mut silent = vec![0.0; 16];
        node.render_block(&mut silent, &ctx);

        assert!(silent.iter().all(|&s| s == 0.0));
    }
}
