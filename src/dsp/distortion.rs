//! Distortion / Waveshaping
//!
//! Distortion adds harmonics by reshaping the waveform through a fixed
//! transfer curve. The curve is computed once per distortion amount and then
//! looked up per sample, so changing the amount costs one table rebuild and
//! playing notes costs nothing extra.
//!
//! # The Transfer Curve
//!
//! For a table of `CURVE_SIZE` entries, entry `i` maps the input
//! `x = i * 2 / CURVE_SIZE - 1` (so -1 ..= ~1) to
//!
//! ```text
//!          (3 + k) * x * 20 * deg
//!   f(x) = ----------------------      k = amount (0 - 100), deg = PI / 180
//!              PI + k * |x|
//! ```
//!
//! Small `k` stays close to a straight line. Large `k` flattens the top of the
//! curve quickly, which is the "overdriven amp" sound.
//!
//! # Oversampling
//!
//! A nonlinear curve creates harmonics above Nyquist that fold back as
//! inharmonic aliasing. The shaper runs at 4x the sample rate: each input
//! sample is linearly interpolated into four sub-samples, each is shaped, and
//! the four results are averaged back down.

use std::f32::consts::PI;
use std::sync::Arc;

/// Number of entries in a distortion transfer table.
pub const CURVE_SIZE: usize = 44_100;

/// Sub-samples per input sample in the waveshaper.
pub const OVERSAMPLE: usize = 4;

const DEG: f32 = PI / 180.0;

/// A waveshaping transfer table together with the amount that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionCurve {
    amount: f32,
    table: Vec<f32>,
}

impl DistortionCurve {
    /// Build the table for `amount` (clamped to 0 - 100).
    pub fn new(amount: f32) -> Self {
        let amount = amount.clamp(0.0, 100.0);
        let normalized = amount / 100.0;
        let k = normalized * 100.0;

        let table = (0..CURVE_SIZE)
            .map(|i| {
                let x = (i as f32 * 2.0) / CURVE_SIZE as f32 - 1.0;
                ((3.0 + k) * x * 20.0 * DEG) / (PI + k * x.abs())
            })
            .collect();

        Self { amount, table }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    /// Look up the shaped value for `x`, interpolating between entries.
    /// Input outside -1 ..= 1 is clamped to the table edges.
    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        // Inverse of the table's x mapping, so x = 0 lands on entry N / 2
        let size = self.table.len();
        let last = size - 1;
        let position = (x.clamp(-1.0, 1.0) + 1.0) * 0.5 * size as f32;
        let index = position.floor() as usize;

        if index >= last {
            return self.table[last];
        }

        let frac = position - index as f32;
        let a = self.table[index];
        let b = self.table[index + 1];
        a + (b - a) * frac
    }
}

/// Memoizes the most recent distortion curve.
///
/// Only one curve is kept. Asking for the cached amount hands back the same
/// `Arc`; any other amount rebuilds the table.
#[derive(Debug, Default)]
pub struct DistortionCurveCache {
    cached: Option<Arc<DistortionCurve>>,
    generations: u64,
}

impl DistortionCurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curve for `amount`, or `None` when the amount is zero (bypass).
    pub fn curve(&mut self, amount: f32) -> Option<Arc<DistortionCurve>> {
        let amount = amount.clamp(0.0, 100.0);
        if amount <= 0.0 {
            return None;
        }

        if let Some(curve) = &self.cached {
            if curve.amount() == amount {
                return Some(Arc::clone(curve));
            }
        }

        log::debug!(target: "fretsynth::engine", "rebuilding distortion curve for amount {}", amount);
        let curve = Arc::new(DistortionCurve::new(amount));
        self.cached = Some(Arc::clone(&curve));
        self.generations += 1;
        Some(curve)
    }

    /// Amount of the currently cached curve, if any.
    pub fn cached_amount(&self) -> Option<f32> {
        self.cached.as_ref().map(|curve| curve.amount())
    }

    /// How many times a curve has been built.
    pub fn generations(&self) -> u64 {
        self.generations
    }
}

/// Oversampled waveshaper state. Holds the previous input for interpolation.
pub struct Waveshaper {
    curve: Arc<DistortionCurve>,
    previous: f32,
}

impl Waveshaper {
    pub fn new(curve: Arc<DistortionCurve>) -> Self {
        Self {
            curve,
            previous: 0.0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let mut acc = 0.0;
        for step in 1..=OVERSAMPLE {
            let t = step as f32 / OVERSAMPLE as f32;
            let upsampled = self.previous + (sample - self.previous) * t;
            acc += self.curve.shape(upsampled);
        }
        self.previous = sample;
        acc / OVERSAMPLE as f32
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_bypasses() {
        let mut cache = DistortionCurveCache::new();
        assert!(cache.curve(0.0).is_none());
        assert!(cache.curve(0.0).is_none());
        assert!(cache.curve(-5.0).is_none());
        assert_eq!(cache.generations(), 0);
    }

    #[test]
    fn test_curve_has_fixed_length() {
        let curve = DistortionCurve::new(50.0);
        assert_eq!(curve.table().len(), CURVE_SIZE);
    }

    #[test]
    fn test_curve_matches_formula() {
        let curve = DistortionCurve::new(50.0);
        let k = 50.0;

        for i in [0usize, 1, 11_025, 22_050, 33_075, CURVE_SIZE - 1] {
            let x = (i as f32 * 2.0) / CURVE_SIZE as f32 - 1.0;
            let expected = ((3.0 + k) * x * 20.0 * DEG) / (PI + k * x.abs());
            assert!((curve.table()[i] - expected).abs() < 1e-6);
        }
        // Entry CURVE_SIZE / 2 maps x = 0
        assert_eq!(curve.table()[CURVE_SIZE / 2], 0.0);
    }

    #[test]
    fn test_curve_is_odd_and_monotonic() {
        let curve = DistortionCurve::new(80.0);
        assert!(curve.table().windows(2).all(|w| w[0] <= w[1]));
        assert!((curve.shape(0.5) + curve.shape(-0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_repeat_amount_returns_same_table() {
        let mut cache = DistortionCurveCache::new();
        let first = cache.curve(50.0).unwrap();
        let second = cache.curve(50.0).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.table(), second.table());
        assert_eq!(cache.generations(), 1);
    }

    #[test]
    fn test_amount_change_regenerates() {
        let mut cache = DistortionCurveCache::new();
        let first = cache.curve(50.0).unwrap();
        let other = cache.curve(51.0).unwrap();
        let back = cache.curve(50.0).unwrap();

        assert!(!Arc::ptr_eq(&first, &other));
        assert!(!Arc::ptr_eq(&first, &back));
        assert_eq!(first.table(), back.table(), "same amount, same values");
        assert_eq!(cache.generations(), 3);
        assert_eq!(cache.cached_amount(), Some(50.0));
    }

    #[test]
    fn test_zero_does_not_evict_cache() {
        let mut cache = DistortionCurveCache::new();
        let first = cache.curve(30.0).unwrap();
        assert!(cache.curve(0.0).is_none());
        let again = cache.curve(30.0).unwrap();

        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_zero_input_maps_to_zero() {
        for amount in [1.0, 50.0, 100.0] {
            let curve = DistortionCurve::new(amount);
            assert_eq!(curve.shape(0.0), 0.0, "amount {}", amount);
        }

        let mut shaper = Waveshaper::new(Arc::new(DistortionCurve::new(100.0)));
        let mut silence = vec![0.0f32; 8];
        shaper.render(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0), "shaped silence {:?}", silence);
    }

    #[test]
    fn test_shape_hits_table_entries_exactly() {
        let curve = DistortionCurve::new(70.0);
        for i in [0usize, 11_025, 33_075] {
            let x = (i as f32 * 2.0) / CURVE_SIZE as f32 - 1.0;
            assert!((curve.shape(x) - curve.table()[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn test_shape_clamps_out_of_range_input() {
        let curve = DistortionCurve::new(40.0);
        assert_eq!(curve.shape(5.0), curve.shape(1.0));
        assert_eq!(curve.shape(-5.0), curve.shape(-1.0));
    }

    #[test]
    fn test_waveshaper_compresses_peaks() {
        let curve = Arc::new(DistortionCurve::new(100.0));
        let mut shaper = Waveshaper::new(curve);
        let mut quiet = vec![0.1f32; 64];
        let mut loud = vec![1.0f32; 64];

        shaper.render(&mut quiet);
        shaper.reset();
        shaper.render(&mut loud);

        // Tenfold more input gives far less than tenfold more output
        let ratio = loud[63] / quiet[63];
        assert!(ratio > 1.0 && ratio < 5.0, "ratio {}", ratio);
    }

    #[test]
    fn test_waveshaper_output_is_finite_and_bounded() {
        let curve = Arc::new(DistortionCurve::new(75.0));
        let mut shaper = Waveshaper::new(curve);
        let mut buffer: Vec<f32> = (0..512).map(|i| (i as f32 * 0.3).sin() * 1.5).collect();

        shaper.render(&mut buffer);

        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }
}
