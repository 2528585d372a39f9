//! Gain and summing primitives.

/*
Gain
====

  gain          A multiplier applied to amplitude.
                  gain > 1.0  →  louder
                  gain = 1.0  →  unchanged (unity)
                  gain < 1.0  →  quieter
                  gain = 0.0  →  silence

Decibels, for reference:  ×0.7 ≈ -3 dB,  ×0.5 ≈ -6 dB,  ×0.1 = -20 dB.

Two places in the instrument use a fixed gain: the makeup stage after the
distortion (pulling the level back down as drive goes up) and the master
output (volume, and the brief mute on stop).

Summing
=======

Notes are mixed by adding them. Six strings at full velocity can exceed 1.0;
the master gain is what keeps the final output in range.
*/

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Add `source` into `out` sample by sample.
#[inline]
pub fn add_into(out: &mut [f32], source: &[f32]) {
    debug_assert!(source.len() <= out.len());

    for (o, &s) in out.iter_mut().zip(source.iter()) {
        *o += s;
    }
}
