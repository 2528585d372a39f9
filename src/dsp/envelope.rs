use crate::MIN_TIME;

/*
Attack/Release Fades
====================

A Karplus-Strong buffer starts with a burst of full-scale noise on sample zero
and is cut off wherever the note duration ends. Both edges click. The fade
envelope rounds them off with two linear ramps applied in place.

  Level
    1.0 ┐   ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │  ╱                     ╲
        │ ╱                       ╲
    0.0 └╱─────────────────────────╲──→ Time
        attack                  release
        (from the head)         (ending on the last sample)

Vocabulary
----------

  attack    Seconds to ramp 0 → 1 at the start of the buffer.
  release   Seconds to ramp 1 → 0 at the end of the buffer.

The Math
--------

    attack_samples  = attack  * sample_rate
    release_samples = release * sample_rate

    gain[i]             = i / attack_samples             (head)
    gain[len - 1 - j]   = j / release_samples            (tail)

Short Buffers
-------------

When attack + release is longer than the buffer, both ramps are scaled down by
the same factor so they meet in the middle. The shape stays symmetric to the
requested proportions and nothing is ever multiplied twice.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    attack: f32,
    release: f32,
}

impl FadeEnvelope {
    pub fn new(attack: f32, release: f32) -> Self {
        Self {
            attack: attack.max(MIN_TIME),
            release: release.max(MIN_TIME),
        }
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    /// Ramp lengths in samples for a buffer of `len` samples.
    fn ramp_samples(&self, len: usize, sample_rate: f32) -> (usize, usize) {
        let attack = (self.attack * sample_rate).round().max(1.0);
        let release = (self.release * sample_rate).round().max(1.0);
        let total = attack + release;

        if total <= len as f32 {
            return (attack as usize, release as usize);
        }

        let scale = len as f32 / total;
        let attack = (attack * scale).floor() as usize;
        (attack, len - attack)
    }

    /// Apply both fades to the buffer in place.
    pub fn apply(&self, buffer: &mut [f32], sample_rate: f32) {
        let len = buffer.len();
        if len == 0 {
            return;
        }

        let (attack, release) = self.ramp_samples(len, sample_rate);

        for (i, sample) in buffer[..attack].iter_mut().enumerate() {
            *sample *= i as f32 / attack as f32;
        }

        let tail = &mut buffer[len - release..];
        for (j, sample) in tail.iter_mut().rev().enumerate() {
            *sample *= j as f32 / release as f32;
        }
    }
}
