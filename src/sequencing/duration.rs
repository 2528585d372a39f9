/// Musical note duration represented as a rational fraction of a whole note.
/// Step spacing is kept exact until the tempo turns it into seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Numerator: how many parts
    pub numerator: u32,
    /// Denominator: of what size (4 = quarter, 8 = eighth, etc.)
    pub denominator: u32,
}

impl Duration {
    pub const QUARTER: Duration = Duration {
        numerator: 1,
        denominator: 4,
    };
    pub const EIGHTH: Duration = Duration {
        numerator: 1,
        denominator: 8,
    };
    pub const SIXTEENTH: Duration = Duration {
        numerator: 1,
        denominator: 16,
    };

    pub const EIGHTH_TRIPLET: Duration = Duration::EIGHTH.triplet();

    /// Apply a dot: multiply duration by 3/2
    pub const fn dotted(self) -> Self {
        Duration {
            numerator: self.numerator * 3,
            denominator: self.denominator * 2,
        }
    }

    /// Three notes in the time of two
    pub const fn triplet(self) -> Self {
        Duration {
            numerator: self.numerator * 2,
            denominator: self.denominator * 3,
        }
    }

    /// Length in beats, where a beat is a quarter note.
    pub fn beats(&self) -> f64 {
        self.numerator as f64 * 4.0 / self.denominator as f64
    }

    /// Length in seconds at `bpm` quarter notes per minute.
    pub fn seconds_at(&self, bpm: f64) -> f64 {
        self.beats() * 60.0 / bpm
    }

    /// Parse a subdivision name as used on the command line.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "quarter" | "1/4" => Some(Self::QUARTER),
            "eighth" | "1/8" => Some(Self::EIGHTH),
            "sixteenth" | "1/16" => Some(Self::SIXTEENTH),
            "triplet" | "1/8t" => Some(Self::EIGHTH_TRIPLET),
            "dotted-eighth" | "1/8." => Some(Self::EIGHTH.dotted()),
            _ => None,
        }
    }
}
