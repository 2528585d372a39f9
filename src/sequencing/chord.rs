use std::fmt;
use std::str::FromStr;

use crate::synth::frequency::STRING_COUNT;

/// Frets for all six strings, lowest string first. `None` is a muted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChordShape(pub [Option<u8>; STRING_COUNT]);

impl ChordShape {
    /// Build from collaborator chord data, where any negative fret means muted.
    pub fn from_frets(frets: [i8; STRING_COUNT]) -> Self {
        let mut shape = [None; STRING_COUNT];
        for (slot, fret) in shape.iter_mut().zip(frets) {
            if fret >= 0 {
                *slot = Some(fret as u8);
            }
        }
        Self(shape)
    }

    pub fn fret(&self, string: usize) -> Option<u8> {
        self.0.get(string).copied().flatten()
    }

    /// Number of strings that actually sound.
    pub fn sounded(&self) -> usize {
        self.0.iter().filter(|fret| fret.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordParseError {
    WrongStringCount(usize),
    InvalidFret(String),
}

impl fmt::Display for ChordParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordParseError::WrongStringCount(count) => {
                write!(f, "expected {} strings, found {}", STRING_COUNT, count)
            }
            ChordParseError::InvalidFret(token) => write!(f, "invalid fret '{}'", token),
        }
    }
}

impl std::error::Error for ChordParseError {}

fn parse_fret(token: &str) -> Result<Option<u8>, ChordParseError> {
    match token {
        "x" | "X" | "-1" => Ok(None),
        _ => token
            .parse::<u8>()
            .map(Some)
            .map_err(|_| ChordParseError::InvalidFret(token.to_string())),
    }
}

impl FromStr for ChordShape {
    type Err = ChordParseError;

    /// Accepts compact notation (`"x32010"`) or separated frets for shapes
    /// above the ninth fret (`"x,10,12,12,12,10"` or `"x 10 12 12 12 10"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tokens: Vec<String> = if s.contains(|c: char| c == ',' || c.is_whitespace()) {
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            s.chars().map(String::from).collect()
        };

        if tokens.len() != STRING_COUNT {
            return Err(ChordParseError::WrongStringCount(tokens.len()));
        }

        let mut shape = [None; STRING_COUNT];
        for (slot, token) in shape.iter_mut().zip(&tokens) {
            *slot = parse_fret(token)?;
        }
        Ok(Self(shape))
    }
}
