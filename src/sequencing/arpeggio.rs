use std::fmt;
use std::str::FromStr;

use crate::sequencing::{
    duration::Duration,
    event::{NoteSchedule, PlayedNote},
};
use crate::synth::frequency::STRING_COUNT;

pub const MIN_BPM: f32 = 20.0;
pub const MAX_BPM: f32 = 300.0;
pub const DEFAULT_BPM: f32 = 120.0;

/// Seconds added after the last step before the arpeggio counts as finished.
pub const ARPEGGIO_TAIL: f64 = 0.5;

const ROOT_VELOCITY: f32 = 0.85;
const STEP_VELOCITY: f32 = 0.7;
const LEGATO_VELOCITY: f32 = 0.55;
/// Legato note length as a fraction of a beat.
const LEGATO_BEATS: f64 = 0.6;

/// One picked note of an arpeggio pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpeggioStep {
    pub string: usize,
    pub fret: u8,
    /// Chord degree label, e.g. "R", "3", "b7".
    pub interval: String,
    /// Hammer-on or pull-off: shorter and softer than a picked note.
    pub legato: bool,
}

impl ArpeggioStep {
    pub fn new(string: usize, fret: u8, interval: impl Into<String>) -> Self {
        Self {
            string,
            fret,
            interval: interval.into(),
            legato: false,
        }
    }

    pub fn legato(mut self) -> Self {
        self.legato = true;
        self
    }

    pub fn is_root(&self) -> bool {
        self.interval == "R" || self.interval == "1"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArpeggioPattern(pub Vec<ArpeggioStep>);

impl ArpeggioPattern {
    pub fn steps(&self) -> &[ArpeggioStep] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ArpeggioStep>> for ArpeggioPattern {
    fn from(steps: Vec<ArpeggioStep>) -> Self {
        Self(steps)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternParseError {
    Empty,
    MalformedStep(String),
}

impl fmt::Display for PatternParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternParseError::Empty => write!(f, "arpeggio pattern has no steps"),
            PatternParseError::MalformedStep(step) => {
                write!(f, "expected string:fret:interval, found '{}'", step)
            }
        }
    }
}

impl std::error::Error for PatternParseError {}

impl FromStr for ArpeggioStep {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PatternParseError::MalformedStep(s.to_string());
        let (body, legato) = match s.strip_suffix('~') {
            Some(body) => (body, true),
            None => (s, false),
        };

        let mut parts = body.split(':');
        let string = parts
            .next()
            .and_then(|p| p.parse::<usize>().ok())
            .ok_or_else(malformed)?;
        let fret = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        let interval = parts.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            string,
            fret,
            interval: interval.to_string(),
            legato,
        })
    }
}

impl FromStr for ArpeggioPattern {
    type Err = PatternParseError;

    /// `"5:3:R 4:2:3 3:0:5~"`: steps separated by spaces or commas, a
    /// trailing `~` marks a legato step.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<ArpeggioStep>, _>>()?;

        if steps.is_empty() {
            return Err(PatternParseError::Empty);
        }
        Ok(Self(steps))
    }
}

/// Lays an arpeggio pattern out on the clock at a fixed tempo.
#[derive(Debug, Clone, Copy)]
pub struct ArpeggioScheduler {
    bpm: f32,
    subdivision: Duration,
}

impl ArpeggioScheduler {
    /// Tempo is clamped to 20 - 300 BPM.
    pub fn new(bpm: f32) -> Self {
        let bpm = if bpm.is_finite() { bpm } else { DEFAULT_BPM };
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
            subdivision: Duration::EIGHTH,
        }
    }

    /// Step spacing. Eighth notes unless changed.
    pub fn with_subdivision(mut self, subdivision: Duration) -> Self {
        self.subdivision = subdivision;
        self
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn beat_secs(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    pub fn step_secs(&self) -> f64 {
        self.subdivision.seconds_at(self.bpm as f64)
    }

    pub fn schedule(&self, pattern: &ArpeggioPattern, base_time: f64) -> NoteSchedule {
        let step = self.step_secs();
        let legato_secs = (self.beat_secs() * LEGATO_BEATS) as f32;
        let mut notes = Vec::with_capacity(pattern.len());

        for (idx, arp) in pattern.steps().iter().enumerate() {
            if arp.string >= STRING_COUNT {
                log::warn!(
                    target: "fretsynth::engine",
                    "dropping arpeggio step {} on string {}",
                    idx,
                    arp.string
                );
                continue;
            }

            let start = base_time + idx as f64 * step;
            let note = if arp.legato {
                PlayedNote::new(arp.string, arp.fret, LEGATO_VELOCITY, start)
                    .with_duration(legato_secs)
            } else if arp.is_root() {
                PlayedNote::new(arp.string, arp.fret, ROOT_VELOCITY, start)
            } else {
                PlayedNote::new(arp.string, arp.fret, STEP_VELOCITY, start)
            };
            notes.push(note);
        }

        NoteSchedule {
            notes,
            total_duration: pattern.len() as f64 * step + ARPEGGIO_TAIL,
        }
    }
}

impl Default for ArpeggioScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}
