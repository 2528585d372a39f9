use rand::Rng;

use crate::sequencing::{chord::ChordShape, event::NoteSchedule, event::PlayedNote};
use crate::synth::{
    frequency::STRING_COUNT,
    presets::{StrumPattern, StrumPreset},
};

/*
Strum Timing
============

A strum is the chord's sounded strings started one after another:

  down:  string 0 → 5   (low E first)
  up:    string 5 → 0   (high E first)

Muted strings are skipped and do not take up a slot, so x32010 strummed down
puts the A string at offset 0, not at one delay.

    start(n) = base + n * delay  (+ jitter, never earlier than base)

Down-up plays a second pass in the opposite direction after a pause:

    second pass base = base + sounded * delay + pause

The guard holds for a fixed window no matter how many strings sound:

    single:   6 * delay + 0.1 s
    down-up:  2 * (6 * delay) + pause + 0.1 s
*/

/// Seconds added after the last slot before the strum counts as finished.
pub const STRUM_TAIL: f64 = 0.1;

const MIN_VELOCITY: f32 = 0.7;
const MAX_VELOCITY: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrumDirection {
    #[default]
    Down,
    Up,
}

impl StrumDirection {
    pub fn reversed(self) -> Self {
        match self {
            StrumDirection::Down => StrumDirection::Up,
            StrumDirection::Up => StrumDirection::Down,
        }
    }

    fn strings(self) -> Box<dyn Iterator<Item = usize>> {
        match self {
            StrumDirection::Down => Box::new(0..STRING_COUNT),
            StrumDirection::Up => Box::new((0..STRING_COUNT).rev()),
        }
    }
}

pub struct StrumScheduler<'a> {
    preset: &'a StrumPreset,
}

impl<'a> StrumScheduler<'a> {
    pub fn new(preset: &'a StrumPreset) -> Self {
        Self { preset }
    }

    /// Window the guard stays held for, in seconds.
    pub fn total_duration(&self) -> f64 {
        let sweep = self.preset.delay_secs() * STRING_COUNT as f64;
        match self.preset.pattern {
            StrumPattern::Single => sweep + STRUM_TAIL,
            StrumPattern::DownUp => 2.0 * sweep + self.preset.pause_secs() + STRUM_TAIL,
        }
    }

    pub fn schedule<R: Rng + ?Sized>(
        &self,
        chord: &ChordShape,
        direction: StrumDirection,
        base_time: f64,
        rng: &mut R,
    ) -> NoteSchedule {
        let mut notes = Vec::with_capacity(chord.sounded() * 2);
        let played = self.pass(chord, direction, base_time, rng, &mut notes);

        if self.preset.pattern == StrumPattern::DownUp {
            let second_base =
                base_time + played as f64 * self.preset.delay_secs() + self.preset.pause_secs();
            self.pass(chord, direction.reversed(), second_base, rng, &mut notes);
        }

        NoteSchedule {
            notes,
            total_duration: self.total_duration(),
        }
    }

    /// One sweep across the strings. Returns how many strings sounded.
    fn pass<R: Rng + ?Sized>(
        &self,
        chord: &ChordShape,
        direction: StrumDirection,
        base_time: f64,
        rng: &mut R,
        notes: &mut Vec<PlayedNote>,
    ) -> usize {
        let delay = self.preset.delay_secs();
        let variation = self.preset.variation_secs();
        let mut slot = 0;

        for string in direction.strings() {
            let Some(fret) = chord.fret(string) else {
                continue;
            };

            let mut offset = slot as f64 * delay;
            if variation > 0.0 {
                offset += rng.gen_range(-variation..=variation);
            }

            let velocity = rng.gen_range(MIN_VELOCITY..MAX_VELOCITY);
            notes.push(PlayedNote::new(string, fret, velocity, base_time + offset.max(0.0)));
            slot += 1;
        }

        slot
    }
}
