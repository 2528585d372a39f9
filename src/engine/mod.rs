//! The engine context.
//!
//! An [`Engine`] owns everything a guitar needs to sound: the audio sink, the
//! tuning, the active presets, the distortion curve cache, the playback guard
//! and the timed task queue. Nothing is global, so independent engines (one
//! per test, say) never see each other.
//!
//! # Lifecycle
//!
//! ```text
//! Engine::new ──→ initialize ──→ play_chord / play_arpeggio / ... ──→ dispose
//!   (silent)      (sink runs)
//! ```
//!
//! Notes scheduled before `initialize` are computed normally but stay silent
//! until the sink starts, because the sink clock does not run while suspended.
//!
//! # Timing
//!
//! Every request is placed `lookahead` seconds after the sink clock so the
//! first note is never scheduled in the past. Call [`Engine::poll`] (every
//! entry point does) to run deferred work such as releasing a finished
//! strum's voice.

pub mod config;
pub mod guard;
pub mod scheduler;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    dsp::distortion::DistortionCurveCache,
    io::{
        settings::{SettingsStore, TUNING_OFFSET_KEY},
        sink::{AudioSink, SinkState},
    },
    sequencing::{
        arpeggio::{ArpeggioPattern, ArpeggioScheduler},
        chord::ChordShape,
        event::{NoteSchedule, PlayedNote},
        strum::{StrumDirection, StrumScheduler},
    },
    synth::{
        frequency::{OpenStringTuning, Tuning},
        presets::{StrumPreset, TonePreset},
        voice::NoteRealizer,
    },
};

pub use config::{EngineConfig, EngineError};
pub use guard::{PlaybackGuard, SingleVoice, VoiceId, VoicePool, VoiceState};
pub use scheduler::{Task, TaskHandle, TaskScheduler};

/// How long `stop()` holds the master gain at zero.
pub const STOP_MUTE_SECS: f64 = 0.1;

/// Completion handle for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    /// Guard voice, `None` for single notes (they bypass the guard).
    pub voice: Option<VoiceId>,
    /// Scheduled notes with their durations resolved.
    pub notes: Vec<PlayedNote>,
    /// Sink clock at the moment of the request.
    pub triggered_at: f64,
    /// Clock time at which the playback counts as finished.
    pub ends_at: f64,
}

impl Playback {
    pub fn duration(&self) -> f64 {
        self.ends_at - self.triggered_at
    }
}

pub struct Engine<S: AudioSink> {
    sink: S,
    tuning: Tuning,
    tone: &'static TonePreset,
    strum: &'static StrumPreset,
    volume: f32,
    distortion: f32,
    tempo: f32,
    lookahead: f64,
    curves: DistortionCurveCache,
    guard: Box<dyn PlaybackGuard>,
    tasks: TaskScheduler,
    /// Release timer of every voice the guard holds.
    timers: Vec<(VoiceId, TaskHandle)>,
    settings: Option<Box<dyn SettingsStore>>,
    rng: StdRng,
}

impl<S: AudioSink> Engine<S> {
    /// Build an engine around `sink`. Nothing is audible until [`Engine::initialize`].
    pub fn new(sink: S, config: EngineConfig) -> Result<Self, EngineError> {
        let tone = TonePreset::by_name(&config.tone)
            .ok_or_else(|| EngineError::Config(format!("unknown tone preset '{}'", config.tone)))?;
        let strum = StrumPreset::by_name(&config.strum).ok_or_else(|| {
            EngineError::Config(format!("unknown strum preset '{}'", config.strum))
        })?;
        let open = OpenStringTuning::by_name(&config.open_tuning).ok_or_else(|| {
            EngineError::Config(format!("unknown tuning '{}'", config.open_tuning))
        })?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = Self {
            sink,
            tuning: Tuning::new(open)
                .with_offset(config.tuning_offset)
                .with_capo(config.capo),
            tone,
            strum,
            volume: clamp_volume(config.volume, 0.7),
            distortion: 0.0,
            tempo: ArpeggioScheduler::new(config.tempo).bpm(),
            lookahead: config.lookahead.max(0.0),
            curves: DistortionCurveCache::new(),
            guard: Box::new(SingleVoice::new()),
            tasks: TaskScheduler::new(),
            timers: Vec::new(),
            settings: None,
            rng,
        };

        engine.set_distortion(config.distortion);
        let now = engine.sink.current_time();
        engine.sink.set_master_gain_at(engine.volume, now);

        log::debug!(
            target: "fretsynth::engine",
            "engine created: tone {}, strum {}, {} Hz",
            tone.name,
            strum.name,
            engine.sink.sample_rate()
        );
        Ok(engine)
    }

    /// Swap the concurrency policy. Any held voices are forgotten.
    pub fn with_guard(mut self, guard: Box<dyn PlaybackGuard>) -> Self {
        self.tasks.clear();
        self.timers.clear();
        self.guard = guard;
        self
    }

    /// Attach persistence. The stored tuning offset, if any, replaces the current one.
    pub fn with_settings(mut self, store: Box<dyn SettingsStore>) -> Self {
        match store.load_i32(TUNING_OFFSET_KEY) {
            Ok(Some(offset)) => {
                let applied = self.tuning.set_tuning_offset(offset);
                log::debug!(target: "fretsynth::settings", "loaded tuning offset {}", applied);
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!(target: "fretsynth::settings", "ignoring stored tuning offset: {}", err)
            }
        }
        self.settings = Some(store);
        self
    }

    /// Start the audio output. Required once before anything is heard.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.resume()?;
        log::info!(target: "fretsynth::engine", "engine initialized");
        Ok(())
    }

    /// Retry starting the output, e.g. after a failed `initialize`.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.sink.resume().map_err(|err| {
            log::warn!(target: "fretsynth::engine", "audio output failed to start: {}", err);
            EngineError::Initialization(err)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.sink.state() == SinkState::Running
    }

    /// Cancel pending work, close the sink and hand it back.
    pub fn dispose(mut self) -> S {
        self.tasks.clear();
        self.timers.clear();
        self.guard.release_all();
        self.sink.close();
        log::info!(target: "fretsynth::engine", "engine disposed");
        self.sink
    }

    /// Run every timed task that has come due.
    pub fn poll(&mut self) {
        let now = self.sink.current_time();
        for task in self.tasks.tick(now) {
            match task {
                Task::PlaybackFinished(voice) => {
                    self.timers.retain(|(held, _)| *held != voice);
                    if self.guard.release(voice) {
                        log::debug!(target: "fretsynth::engine", "voice {:?} finished", voice);
                    }
                }
            }
        }
    }

    /// Strum `chord` with the active strum preset.
    ///
    /// `None` when the guard rejects the request; nothing is scheduled then.
    pub fn play_chord(
        &mut self,
        chord: &ChordShape,
        direction: StrumDirection,
    ) -> Option<Playback> {
        self.poll();
        let now = self.sink.current_time();
        let schedule = StrumScheduler::new(self.strum).schedule(
            chord,
            direction,
            now + self.lookahead,
            &mut self.rng,
        );
        self.start_guarded(schedule, now)
    }

    /// Play `pattern` at `bpm`, or the configured tempo.
    pub fn play_arpeggio(
        &mut self,
        pattern: &ArpeggioPattern,
        bpm: Option<f32>,
    ) -> Option<Playback> {
        let scheduler = ArpeggioScheduler::new(bpm.unwrap_or(self.tempo));
        self.play_arpeggio_with(pattern, scheduler)
    }

    /// Play `pattern` with a fully configured scheduler (custom subdivision).
    pub fn play_arpeggio_with(
        &mut self,
        pattern: &ArpeggioPattern,
        scheduler: ArpeggioScheduler,
    ) -> Option<Playback> {
        self.poll();
        let now = self.sink.current_time();
        let schedule = scheduler.schedule(pattern, now + self.lookahead);
        self.start_guarded(schedule, now)
    }

    /// Pluck one note outside the guard. `None` only for a string outside 0..=5.
    pub fn play_single_note(&mut self, string: usize, fret: u8) -> Option<Playback> {
        self.poll();
        if self.tuning.frequency(string, fret).is_none() {
            log::debug!(target: "fretsynth::engine", "no string {}", string);
            return None;
        }

        let now = self.sink.current_time();
        let note = PlayedNote::new(string, fret, 0.8, now + self.lookahead);
        let notes = self.schedule_notes(vec![note]);
        let ends_at = notes
            .iter()
            .map(|note| note.start_time + note.duration_or(0.0) as f64)
            .fold(now, f64::max);

        Some(Playback {
            voice: None,
            notes,
            triggered_at: now,
            ends_at,
        })
    }

    fn start_guarded(&mut self, schedule: NoteSchedule, now: f64) -> Option<Playback> {
        let starts_at = now + self.lookahead;
        let ends_at = now + schedule.total_duration;

        let Some(voice) = self.guard.try_acquire(now, starts_at, ends_at) else {
            log::debug!(target: "fretsynth::engine", "playback already in progress, ignoring request");
            return None;
        };

        let notes = self.schedule_notes(schedule.notes);
        // A voice the guard reclaimed on its own leaves a timer behind
        let (guard, tasks) = (&self.guard, &mut self.tasks);
        self.timers.retain(|&(held, timer)| {
            let live = guard.state(held, now) != VoiceState::Idle;
            if !live {
                tasks.cancel(timer);
            }
            live
        });
        let timer = self.tasks.enqueue(ends_at, Task::PlaybackFinished(voice));
        self.timers.push((voice, timer));

        Some(Playback {
            voice: Some(voice),
            notes,
            triggered_at: now,
            ends_at,
        })
    }

    /// Synthesize and queue every note. Returns the notes with durations resolved.
    fn schedule_notes(&mut self, notes: Vec<PlayedNote>) -> Vec<PlayedNote> {
        let curve = self.curves.curve(self.distortion);
        let sample_rate = self.sink.sample_rate();
        let realizer =
            NoteRealizer::new(&self.tuning, self.tone, sample_rate).with_distortion(curve);

        let mut scheduled = Vec::with_capacity(notes.len());
        for mut note in notes {
            note.duration = Some(note.duration_or(self.tone.note_decay));
            match realizer.realize(&note, &mut self.rng) {
                Some(source) => {
                    self.sink.schedule_source(source);
                    scheduled.push(note);
                }
                None => log::warn!(
                    target: "fretsynth::engine",
                    "skipping note on missing string {}",
                    note.string
                ),
            }
        }
        scheduled
    }

    /// Mute now, restore after a moment, and forget every held voice.
    ///
    /// Already scheduled notes keep rendering underneath the mute; only the
    /// pending "finished" transitions are cancelled.
    pub fn stop(&mut self) {
        self.poll();
        let now = self.sink.current_time();
        self.sink.set_master_gain_at(0.0, now);
        self.sink.set_master_gain_at(self.volume, now + STOP_MUTE_SECS);

        let cancelled = self
            .timers
            .drain(..)
            .filter(|(_, timer)| self.tasks.cancel(*timer))
            .count();
        self.guard.release_all();
        log::info!(
            target: "fretsynth::engine",
            "stopped, cancelled {} pending transition(s)",
            cancelled
        );
    }

    /// Set the master volume (clamped to 0 - 1). Returns the value applied.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.poll();
        self.volume = clamp_volume(volume, self.volume);
        let now = self.sink.current_time();
        self.sink.set_master_gain_at(self.volume, now);
        self.volume
    }

    /// Set and persist the tuning offset (clamped to -6 ..= 6).
    pub fn set_tuning_offset(&mut self, semitones: i32) -> i32 {
        self.poll();
        let applied = self.tuning.set_tuning_offset(semitones);
        if let Some(store) = self.settings.as_mut() {
            if let Err(err) = store.store_i32(TUNING_OFFSET_KEY, applied) {
                log::warn!(target: "fretsynth::settings", "failed to persist tuning offset: {}", err);
            }
        }
        applied
    }

    /// Set the capo fret (clamped to 0 ..= 7).
    pub fn set_capo_fret(&mut self, fret: i32) -> i32 {
        self.poll();
        self.tuning.set_capo(fret)
    }

    /// Set the distortion amount (clamped to 0 - 100) and warm the curve cache.
    pub fn set_distortion(&mut self, amount: f32) -> f32 {
        self.poll();
        let amount = if amount.is_finite() { amount.clamp(0.0, 100.0) } else { self.distortion };
        self.distortion = amount;
        self.curves.curve(amount);
        amount
    }

    /// Select a tone preset by key. Unknown keys keep the current preset.
    pub fn set_guitar_tone(&mut self, key: &str) -> &'static str {
        self.poll();
        match TonePreset::by_name(key) {
            Some(tone) => {
                self.tone = tone;
                log::debug!(target: "fretsynth::engine", "tone preset {}", tone.name);
            }
            None => log::debug!(target: "fretsynth::engine", "unknown tone preset '{}'", key),
        }
        self.tone.name
    }

    /// Select a strum preset by key. Unknown keys keep the current preset.
    pub fn set_strum_style(&mut self, key: &str) -> &'static str {
        self.poll();
        match StrumPreset::by_name(key) {
            Some(strum) => {
                self.strum = strum;
                log::debug!(target: "fretsynth::engine", "strum preset {}", strum.name);
            }
            None => log::debug!(target: "fretsynth::engine", "unknown strum preset '{}'", key),
        }
        self.strum.name
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tone(&self) -> &'static TonePreset {
        self.tone
    }

    pub fn strum(&self) -> &'static StrumPreset {
        self.strum
    }

    /// Length of a note that does not carry its own duration.
    pub fn note_duration(&self) -> f32 {
        self.tone.note_decay
    }

    pub fn distortion(&self) -> f32 {
        self.distortion
    }

    pub fn curve_cache(&self) -> &DistortionCurveCache {
        &self.curves
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// True while a strum or arpeggio holds the guard. Call `poll` first for
    /// an up-to-date answer.
    pub fn is_playing(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn voice_state(&self, voice: VoiceId) -> VoiceState {
        self.guard.state(voice, self.sink.current_time())
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

fn clamp_volume(volume: f32, fallback: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{offline::OfflineSink, settings::MemoryStore};

    fn engine() -> Engine<OfflineSink> {
        let config = EngineConfig {
            seed: Some(11),
            ..EngineConfig::default()
        };
        Engine::new(OfflineSink::new(8_000.0), config).unwrap()
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let config = EngineConfig {
            tone: "banjo".to_string(),
            ..EngineConfig::default()
        };
        let err = Engine::new(OfflineSink::new(8_000.0), config).err().unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn setters_clamp() {
        let mut engine = engine();
        assert_eq!(engine.set_volume(1.5), 1.0);
        assert_eq!(engine.set_volume(-0.2), 0.0);
        assert_eq!(engine.set_volume(f32::NAN), 0.0);
        assert_eq!(engine.set_tuning_offset(9), 6);
        assert_eq!(engine.set_capo_fret(-1), 0);
        assert_eq!(engine.set_capo_fret(12), 7);
        assert_eq!(engine.set_distortion(140.0), 100.0);
        assert_eq!(engine.set_distortion(-5.0), 0.0);
    }

    #[test]
    fn unknown_preset_keys_keep_selection() {
        let mut engine = engine();
        assert_eq!(engine.set_guitar_tone("nylon"), "nylon");
        assert_eq!(engine.set_guitar_tone("banjo"), "nylon");
        assert_eq!(engine.note_duration(), TonePreset::NYLON.note_decay);

        assert_eq!(engine.set_strum_style("fast"), "fast");
        assert_eq!(engine.set_strum_style(""), "fast");
    }

    #[test]
    fn tuning_offset_is_loaded_and_persisted() {
        let mut store = MemoryStore::new();
        store.store_i32(TUNING_OFFSET_KEY, -2).unwrap();

        let mut engine = engine().with_settings(Box::new(store));
        assert_eq!(engine.tuning().tuning_offset(), -2);

        engine.set_tuning_offset(3);
        let stored = engine
            .settings
            .as_ref()
            .unwrap()
            .load_i32(TUNING_OFFSET_KEY)
            .unwrap();
        assert_eq!(stored, Some(3));
    }

    #[test]
    fn bad_stored_offset_is_ignored() {
        let mut store = MemoryStore::new();
        store.store(TUNING_OFFSET_KEY, "sharp").unwrap();

        let engine = engine().with_settings(Box::new(store));
        assert_eq!(engine.tuning().tuning_offset(), 0);
    }

    #[test]
    fn single_note_bypasses_guard() {
        let mut engine = engine();
        let chord = ChordShape::from_frets([0, 2, 2, 1, 0, 0]);
        assert!(engine.play_chord(&chord, StrumDirection::Down).is_some());

        let note = engine.play_single_note(2, 5).unwrap();
        assert_eq!(note.voice, None);
        assert_eq!(note.notes.len(), 1);
        assert!(engine.play_single_note(6, 0).is_none());
    }

    #[test]
    fn pool_guard_allows_overlap() {
        let mut engine = engine().with_guard(Box::new(VoicePool::new(2)));
        let chord = ChordShape::from_frets([0, 2, 2, 1, 0, 0]);

        assert!(engine.play_chord(&chord, StrumDirection::Down).is_some());
        assert!(engine.play_chord(&chord, StrumDirection::Up).is_some());
        assert!(engine.play_chord(&chord, StrumDirection::Down).is_none());
    }

    #[test]
    fn stop_cancels_each_release_timer() {
        let mut engine = engine().with_guard(Box::new(VoicePool::new(2)));
        let chord = ChordShape::from_frets([0, 2, 2, 1, 0, 0]);
        engine.play_chord(&chord, StrumDirection::Down).unwrap();
        engine.play_chord(&chord, StrumDirection::Up).unwrap();
        assert_eq!(engine.timers.len(), 2);
        assert_eq!(engine.pending_tasks(), 2);

        engine.stop();

        assert!(engine.timers.is_empty());
        assert_eq!(engine.pending_tasks(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn finished_playback_forgets_its_timer() {
        let mut engine = engine();
        engine.initialize().unwrap();
        let chord = ChordShape::from_frets([0, 2, 2, 1, 0, 0]);
        let playback = engine.play_chord(&chord, StrumDirection::Down).unwrap();
        assert_eq!(engine.timers.len(), 1);

        engine.sink_mut().render_seconds(playback.ends_at + 0.01);
        engine.poll();

        assert!(engine.timers.is_empty());
        assert_eq!(engine.pending_tasks(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn dispose_closes_the_sink() {
        let mut engine = engine();
        engine.initialize().unwrap();
        let sink = engine.dispose();
        assert_eq!(sink.state(), SinkState::Closed);
    }
}
