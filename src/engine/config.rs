use std::fmt;

use crate::io::sink::SinkError;
use crate::sequencing::arpeggio::DEFAULT_BPM;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The audio output could not be started.
    Initialization(SinkError),
    /// The configuration names something that does not exist or fails to parse.
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Initialization(err) => {
                write!(f, "failed to initialize audio output: {}", err)
            }
            EngineError::Config(message) => write!(f, "invalid engine configuration: {}", message),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Initialization(err) => Some(err),
            EngineError::Config(_) => None,
        }
    }
}

impl From<SinkError> for EngineError {
    fn from(err: SinkError) -> Self {
        EngineError::Initialization(err)
    }
}

/// Everything the engine starts with.
///
/// With the `serde` feature this loads from TOML; missing keys take the
/// defaults below.
///
/// ```toml
/// tone = "nylon"
/// strum = "natural"
/// volume = 0.6
/// capo = 2
/// tempo = 96
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Tone preset key.
    pub tone: String,
    /// Strum preset key.
    pub strum: String,
    /// Open string tuning name.
    pub open_tuning: String,
    /// Master volume, 0.0 - 1.0.
    pub volume: f32,
    /// Semitones, -6 ..= 6.
    pub tuning_offset: i32,
    /// Capo fret, 0 ..= 7.
    pub capo: i32,
    /// Distortion amount, 0 - 100.
    pub distortion: f32,
    /// Default arpeggio tempo in BPM.
    pub tempo: f32,
    /// Seconds between a request and its first note.
    pub lookahead: f64,
    /// Fixed seed for pluck noise, strum jitter and velocities.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tone: "acoustic".to_string(),
            strum: "standard".to_string(),
            open_tuning: "standard".to_string(),
            volume: 0.7,
            tuning_offset: 0,
            capo: 0,
            distortion: 0.0,
            tempo: DEFAULT_BPM,
            lookahead: 0.05,
            seed: None,
        }
    }
}

#[cfg(feature = "serde")]
impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        toml::from_str(source).map_err(|err| EngineError::Config(err.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|err| EngineError::Config(err.to_string()))
    }
}
