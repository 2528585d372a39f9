/// One note to be plucked: where on the neck, how hard and when.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedNote {
    /// String index, 0 = lowest pitched string.
    pub string: usize,
    pub fret: u8,
    /// 0.0 - 1.0
    pub velocity: f32,
    /// Engine clock time in seconds.
    pub start_time: f64,
    /// Length in seconds. `None` uses the active tone's note decay.
    pub duration: Option<f32>,
}

impl PlayedNote {
    pub fn new(string: usize, fret: u8, velocity: f32, start_time: f64) -> Self {
        Self {
            string,
            fret,
            velocity,
            start_time,
            duration: None,
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Duration, falling back to `default` when the note has none of its own.
    pub fn duration_or(&self, default: f32) -> f32 {
        self.duration.unwrap_or(default)
    }
}

/// Output of a scheduler: the notes in start order plus how long the whole
/// gesture occupies the guard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteSchedule {
    pub notes: Vec<PlayedNote>,
    /// Seconds from the base time until the playback counts as finished.
    pub total_duration: f64,
}

impl NoteSchedule {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}
