use std::sync::Arc;

use rand::Rng;

use crate::{
    dsp::{distortion::DistortionCurve, envelope::FadeEnvelope, karplus::pluck},
    graph::{node::RenderCtx, tone::ToneGraphBuilder},
    io::sink::ScheduledSource,
    sequencing::event::PlayedNote,
    synth::{frequency::Tuning, presets::TonePreset},
};

/// Turns a [`PlayedNote`] into audio ready to schedule.
///
/// Everything that shapes a note is captured here: the tuning that gives
/// its pitch, the tone preset, the current distortion curve. Realizing a
/// note does the full synthesis up front:
///
///   pluck → fade in/out → tone graph (attached, run by the mixer)
pub struct NoteRealizer<'a> {
    tuning: &'a Tuning,
    tone: &'a TonePreset,
    curve: Option<Arc<DistortionCurve>>,
    sample_rate: f32,
}

impl<'a> NoteRealizer<'a> {
    pub fn new(tuning: &'a Tuning, tone: &'a TonePreset, sample_rate: f32) -> Self {
        Self {
            tuning,
            tone,
            curve: None,
            sample_rate,
        }
    }

    pub fn with_distortion(mut self, curve: Option<Arc<DistortionCurve>>) -> Self {
        self.curve = curve;
        self
    }

    /// Synthesize `note`. Returns `None` for a string the tuning doesn't have.
    pub fn realize<R: Rng + ?Sized>(
        &self,
        note: &PlayedNote,
        rng: &mut R,
    ) -> Option<ScheduledSource> {
        let frequency = self.tuning.frequency(note.string, note.fret)?;
        let duration = note.duration_or(self.tone.note_decay);
        let velocity = note.velocity.clamp(0.0, 1.0);

        let mut samples = pluck(
            rng,
            frequency,
            self.sample_rate,
            duration,
            velocity,
            self.tone.decay,
        );
        FadeEnvelope::new(self.tone.attack, self.tone.release).apply(&mut samples, self.sample_rate);

        let graph = ToneGraphBuilder::new(self.tone)
            .distortion(self.curve.clone())
            .build(frequency);

        Some(ScheduledSource::new(
            note.start_time,
            samples,
            Box::new(graph),
            RenderCtx::from_freq(self.sample_rate, frequency, velocity),
        ))
    }
}
