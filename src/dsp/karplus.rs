use rand::Rng;

/*
Karplus-Strong Plucked String
=============================

A plucked string is a burst of energy bouncing back and forth along a string
that loses a little high-frequency content on every round trip. Karplus-Strong
models exactly that with a delay line and a feedback loop.

Vocabulary
----------

  period        Length of one round trip, in samples. sample_rate / frequency.
                A 110 Hz string at 44.1kHz has a period of ~400.9 samples.

  excitation    The initial noise burst. Random samples stand in for the
                chaotic shape of the string at the moment it is plucked.

  decay         Feedback coefficient (0 < decay < 1). Every trip around the
                loop is multiplied by it. 0.996 rings for seconds, 0.98 thuds.


The Loop
--------

    noise ──→ [ delay: period samples ] ──┬──→ output
                      ↑                   │
                      └── × decay ←── avg ┘

The averaging filter (mean of two adjacent samples) is a gentle lowpass: high
harmonics die faster than the fundamental, which is what a real string does.


Fractional Delay
----------------

If the delay is rounded to a whole number of samples, pitch is quantized. At
44.1kHz, E4 (329.63 Hz) has a period of 133.78 samples. Rounding to 134 plays
328.6 Hz, four cents flat, and it gets worse higher up the neck.

Instead we split the period:

    int_period = floor(period)     133
    frac       = period - int      0.78

and read BETWEEN the two taps at i - int_period and i - int_period - 1:

    interp = a + (b - a) * frac

That estimate is then averaged (0.5 blend) with the far tap to form the
classic lowpass feedback, scaled by decay and written back.

    buf[i] = decay * (0.5 * interp + 0.5 * buf[i - int_period - 1])

Note the far tap contributes to both the interpolation and the average, so it
is weighted more heavily than a textbook allpass/linear fractional delay would
weight it. This is the behavior the instrument was voiced with and is kept.
*/

/// Synthesize one plucked note into a fresh buffer.
///
/// The buffer holds `floor(sample_rate * duration)` samples. A non-positive or
/// non-finite frequency yields silence rather than an error.
pub fn pluck<R: Rng + ?Sized>(
    rng: &mut R,
    frequency: f32,
    sample_rate: f32,
    duration: f32,
    velocity: f32,
    decay: f32,
) -> Vec<f32> {
    let len = (sample_rate * duration.max(0.0)) as usize;
    let mut buffer = vec![0.0f32; len];

    if len == 0 || !frequency.is_finite() || frequency <= 0.0 {
        return buffer;
    }

    // Periods under one sample would read the sample being written
    let period = (sample_rate / frequency).max(1.0);
    let int_period = period.floor() as usize;
    let frac = period - int_period as f32;
    let velocity = velocity.clamp(0.0, 1.0);

    let burst = (2 * int_period + 2).min(len);
    for sample in buffer[..burst].iter_mut() {
        *sample = rng.gen_range(-1.0f32..=1.0) * velocity;
    }

    // i >= int_period + 1, so both taps stay in bounds
    for i in (int_period + 1)..len {
        let a = buffer[i - int_period];
        let b = buffer[i - int_period - 1];
        let interp = a + (b - a) * frac;
        buffer[i] = decay * (0.5 * interp + 0.5 * b);
    }

    buffer
}
