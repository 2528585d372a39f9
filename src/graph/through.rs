use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). It is how the tone graph strings its stages together:

  [FilterNode] ──→ [DistortionNode] ──→ [FilterNode] ──→ [GainNode]

How It Works:
-------------
1. Render the source into the output buffer (in place)
2. Pass that buffer through the effect (in place)

  Pluck buffer:    [0.5, 0.8, -0.3, 0.9, ...]
  Lowpass:         [0.4, 0.6, -0.2, 0.7, ...]
  Waveshaper:      [0.3, 0.3, -0.2, 0.3, ...]

Every stage is an in-place processor here: the note buffer is already
rendered, so the chain only transforms it.

Example:
  let drive = DistortionNode::new(curve)
      .through(FilterNode::lowpass(6_000.0))
      .through(GainNode::new(0.85));
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.filter.reset();
    }
}
