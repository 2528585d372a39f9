use std::f32::consts::TAU;

/*
State-Variable Lowpass
======================

The tone chain only ever needs lowpass responses: one to tame the brightness of
the raw pluck, and one after the waveshaper to sand down the fizz distortion
adds. The state-variable topology gives a stable, click-free lowpass whose
cutoff can change between notes without recomputing coefficients tables.

  cutoff (Hz)   Where the response starts to roll off (-3 dB at Q = 0.707,
                a small bump at Q = 1).
  Q             Resonance. k = 1 / Q is the damping term of the SVF. Q = 1 is
                slightly peaky, the usual default for guitar tone stages.

The cutoff is kept a hair below Nyquist; the prewarp (tan) diverges there.
*/

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::with_q(cutoff_hz, 1.0)
    }

    pub fn with_q(cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(0.01),
        }
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * 0.49);
        let wd = TAU * cutoff;
        let wa = (2.0 * sample_rate) * (wd / (2.0 * sample_rate)).tan();
        wa / (2.0 * sample_rate)
    }

    /// Advance one sample and return the lowpass output.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
