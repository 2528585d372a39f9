//! Tone and strum presets.
//!
//! Both catalogs are static tables keyed by name. Selecting an unknown key is
//! not an error: the caller keeps whatever preset it had.

/// Synthesis and filtering parameters for one guitar character.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TonePreset {
    pub name: &'static str,
    /// Karplus-Strong feedback gain. Closer to 1.0 rings longer.
    pub decay: f32,
    /// Fade-in time in seconds.
    pub attack: f32,
    /// Fade-out time in seconds, ending at the last sample.
    pub release: f32,
    /// Default note length in seconds.
    pub note_decay: f32,
    /// Lowpass cutoff as a multiple of the note frequency.
    pub filter_multiplier: f32,
    /// Upper bound on the lowpass cutoff.
    pub filter_max_hz: f32,
}

impl TonePreset {
    pub const ACOUSTIC: TonePreset = TonePreset {
        name: "acoustic",
        decay: 0.996,
        attack: 0.005,
        release: 0.3,
        note_decay: 3.0,
        filter_multiplier: 8.0,
        filter_max_hz: 8_000.0,
    };

    pub const ELECTRIC: TonePreset = TonePreset {
        name: "electric",
        decay: 0.998,
        attack: 0.002,
        release: 0.4,
        note_decay: 4.0,
        filter_multiplier: 12.0,
        filter_max_hz: 12_000.0,
    };

    pub const NYLON: TonePreset = TonePreset {
        name: "nylon",
        decay: 0.994,
        attack: 0.01,
        release: 0.25,
        note_decay: 2.5,
        filter_multiplier: 5.0,
        filter_max_hz: 5_000.0,
    };

    pub const BRIGHT: TonePreset = TonePreset {
        name: "bright",
        decay: 0.997,
        attack: 0.001,
        release: 0.3,
        note_decay: 3.0,
        filter_multiplier: 16.0,
        filter_max_hz: 16_000.0,
    };

    // Palm muted: short, dark and quick to die
    pub const MUTED: TonePreset = TonePreset {
        name: "muted",
        decay: 0.985,
        attack: 0.002,
        release: 0.08,
        note_decay: 0.6,
        filter_multiplier: 3.0,
        filter_max_hz: 3_000.0,
    };

    pub const ALL: [TonePreset; 5] = [
        Self::ACOUSTIC,
        Self::ELECTRIC,
        Self::NYLON,
        Self::BRIGHT,
        Self::MUTED,
    ];

    pub fn by_name(name: &str) -> Option<&'static TonePreset> {
        TONE_PRESETS.iter().find(|preset| preset.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        TONE_PRESETS.iter().map(|preset| preset.name)
    }
}

impl Default for TonePreset {
    fn default() -> Self {
        Self::ACOUSTIC
    }
}

static TONE_PRESETS: [TonePreset; 5] = TonePreset::ALL;

/// How a chord is swept.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrumPattern {
    /// One pass across the strings.
    Single,
    /// A pass in the requested direction, a pause, then a pass back.
    DownUp,
}

/// Timing of a strum.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StrumPreset {
    pub name: &'static str,
    /// Gap between consecutive sounded strings.
    pub inter_string_delay_ms: f32,
    pub pattern: StrumPattern,
    /// Gap between the two passes of a down-up strum.
    pub pause_between_ms: f32,
    /// Maximum timing jitter per string, either side. Zero disables it.
    pub random_variation_ms: f32,
}

impl StrumPreset {
    pub const STANDARD: StrumPreset = StrumPreset {
        name: "standard",
        inter_string_delay_ms: 40.0,
        pattern: StrumPattern::Single,
        pause_between_ms: 0.0,
        random_variation_ms: 0.0,
    };

    pub const FAST: StrumPreset = StrumPreset {
        name: "fast",
        inter_string_delay_ms: 15.0,
        pattern: StrumPattern::Single,
        pause_between_ms: 0.0,
        random_variation_ms: 0.0,
    };

    pub const SLOW: StrumPreset = StrumPreset {
        name: "slow",
        inter_string_delay_ms: 80.0,
        pattern: StrumPattern::Single,
        pause_between_ms: 0.0,
        random_variation_ms: 0.0,
    };

    pub const NATURAL: StrumPreset = StrumPreset {
        name: "natural",
        inter_string_delay_ms: 35.0,
        pattern: StrumPattern::Single,
        pause_between_ms: 0.0,
        random_variation_ms: 8.0,
    };

    pub const DOWN_UP: StrumPreset = StrumPreset {
        name: "down-up",
        inter_string_delay_ms: 30.0,
        pattern: StrumPattern::DownUp,
        pause_between_ms: 150.0,
        random_variation_ms: 0.0,
    };

    pub const ALL: [StrumPreset; 5] = [
        Self::STANDARD,
        Self::FAST,
        Self::SLOW,
        Self::NATURAL,
        Self::DOWN_UP,
    ];

    pub fn by_name(name: &str) -> Option<&'static StrumPreset> {
        STRUM_PRESETS.iter().find(|preset| preset.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        STRUM_PRESETS.iter().map(|preset| preset.name)
    }

    pub fn delay_secs(&self) -> f64 {
        self.inter_string_delay_ms as f64 / 1000.0
    }

    pub fn pause_secs(&self) -> f64 {
        self.pause_between_ms as f64 / 1000.0
    }

    pub fn variation_secs(&self) -> f64 {
        self.random_variation_ms as f64 / 1000.0
    }
}

impl Default for StrumPreset {
    fn default() -> Self {
        Self::STANDARD
    }
}

static STRUM_PRESETS: [StrumPreset; 5] = StrumPreset::ALL;
