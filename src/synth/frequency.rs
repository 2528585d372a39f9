/*
Fretted Pitch
=============

Each fret raises a string by one equal-tempered semitone, a factor of 2^(1/12).
Tuning offset and capo are just more semitones stacked on top:

    semitones = fret + tuning_offset + capo
    frequency = open_frequency * 2^(semitones / 12)

So fret 2 with no capo and capo 2 on the open string are the same pitch. A
negative tuning offset can push the total below zero, which simply lowers the
pitch (tuning down a whole step, say).

Ranges
------

  tuning_offset   -6 ..= +6 semitones (clamped)
  capo            0 ..= 7 (clamped)
  fret            anything; guitars have as many frets as the luthier wanted
*/

pub const STRING_COUNT: usize = 6;

pub const MIN_TUNING_OFFSET: i32 = -6;
pub const MAX_TUNING_OFFSET: i32 = 6;
pub const MAX_CAPO_FRET: i32 = 7;

/// Open string frequencies, index 0 = lowest pitched string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenStringTuning(pub [f32; STRING_COUNT]);

impl OpenStringTuning {
    /// E2 A2 D3 G3 B3 E4
    pub const STANDARD: OpenStringTuning =
        OpenStringTuning([82.41, 110.00, 146.83, 196.00, 246.94, 329.63]);

    /// D2 A2 D3 G3 B3 E4
    pub const DROP_D: OpenStringTuning =
        OpenStringTuning([73.42, 110.00, 146.83, 196.00, 246.94, 329.63]);

    /// D2 A2 D3 G3 A3 D4
    pub const DADGAD: OpenStringTuning =
        OpenStringTuning([73.42, 110.00, 146.83, 196.00, 220.00, 293.66]);

    /// D2 G2 D3 G3 B3 D4
    pub const OPEN_G: OpenStringTuning =
        OpenStringTuning([73.42, 98.00, 146.83, 196.00, 246.94, 293.66]);

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::STANDARD),
            "drop-d" | "drop_d" | "dropd" => Some(Self::DROP_D),
            "dadgad" => Some(Self::DADGAD),
            "open-g" | "open_g" | "openg" => Some(Self::OPEN_G),
            _ => None,
        }
    }

    pub fn open_frequency(&self, string: usize) -> Option<f32> {
        self.0.get(string).copied()
    }
}

impl Default for OpenStringTuning {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Pitch of a fretted note, in Hz.
#[inline]
pub fn fret_frequency(open_hz: f32, fret: i32, tuning_offset: i32, capo: i32) -> f32 {
    let semitones = fret + tuning_offset + capo;
    open_hz * 2.0_f32.powf(semitones as f32 / 12.0)
}

/// Open strings plus the global semitone shifts (tuning offset and capo).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    open: OpenStringTuning,
    tuning_offset: i32,
    capo: i32,
}

impl Tuning {
    pub fn new(open: OpenStringTuning) -> Self {
        Self {
            open,
            tuning_offset: 0,
            capo: 0,
        }
    }

    pub fn with_offset(mut self, semitones: i32) -> Self {
        self.set_tuning_offset(semitones);
        self
    }

    pub fn with_capo(mut self, fret: i32) -> Self {
        self.set_capo(fret);
        self
    }

    /// Set the global tuning offset, clamped to -6 ..= 6. Returns the stored value.
    pub fn set_tuning_offset(&mut self, semitones: i32) -> i32 {
        self.tuning_offset = semitones.clamp(MIN_TUNING_OFFSET, MAX_TUNING_OFFSET);
        self.tuning_offset
    }

    /// Set the capo fret, clamped to 0 ..= 7. Returns the stored value.
    pub fn set_capo(&mut self, fret: i32) -> i32 {
        self.capo = fret.clamp(0, MAX_CAPO_FRET);
        self.capo
    }

    pub fn tuning_offset(&self) -> i32 {
        self.tuning_offset
    }

    pub fn capo(&self) -> i32 {
        self.capo
    }

    pub fn open(&self) -> &OpenStringTuning {
        &self.open
    }

    /// Frequency of `fret` on `string`, or `None` for a string outside 0..=5.
    pub fn frequency(&self, string: usize, fret: u8) -> Option<f32> {
        let open = self.open.open_frequency(string)?;
        Some(fret_frequency(
            open,
            fret as i32,
            self.tuning_offset,
            self.capo,
        ))
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(OpenStringTuning::STANDARD)
    }
}
