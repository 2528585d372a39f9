use crate::io::{
    mixer::Mixer,
    sink::{AudioSink, ScheduledSource, SinkError, SinkState},
};

/// In-memory sink rendered on demand.
///
/// Nothing happens until [`OfflineSink::render`] is called, which makes the
/// clock fully deterministic. While suspended, rendering yields silence and
/// the clock stays where it is, the same way a host audio context behaves
/// before it is allowed to start.
pub struct OfflineSink {
    mixer: Mixer,
    state: SinkState,
    available: bool,
    scheduled: usize,
}

impl OfflineSink {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mixer: Mixer::new(sample_rate, 1.0),
            state: SinkState::Suspended,
            available: true,
            scheduled: 0,
        }
    }

    /// A sink whose `resume` always fails, standing in for a missing device.
    pub fn unavailable(sample_rate: f32) -> Self {
        Self {
            available: false,
            ..Self::new(sample_rate)
        }
    }

    /// Render `frames` mono samples.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        if self.state == SinkState::Running {
            self.mixer.render(&mut out);
        }
        out
    }

    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds.max(0.0) * self.mixer.sample_rate() as f64).round() as usize;
        self.render(frames)
    }

    /// Sources accepted since the sink was created.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// Sources still waiting or still sounding.
    pub fn active_sources(&self) -> usize {
        self.mixer.active_sources()
    }

    pub fn master_gain(&self) -> f32 {
        self.mixer.gain()
    }
}

impl AudioSink for OfflineSink {
    fn sample_rate(&self) -> f32 {
        self.mixer.sample_rate()
    }

    fn current_time(&self) -> f64 {
        self.mixer.current_time()
    }

    fn state(&self) -> SinkState {
        self.state
    }

    fn resume(&mut self) -> Result<(), SinkError> {
        match self.state {
            SinkState::Running => Ok(()),
            SinkState::Closed => Err(SinkError::Unavailable),
            SinkState::Suspended if !self.available => Err(SinkError::Unavailable),
            SinkState::Suspended => {
                self.state = SinkState::Running;
                log::info!(target: "fretsynth::sink", "offline sink running");
                Ok(())
            }
        }
    }

    fn schedule_source(&mut self, source: ScheduledSource) {
        if self.state == SinkState::Closed {
            log::debug!(target: "fretsynth::sink", "dropping source scheduled on a closed sink");
            return;
        }
        self.scheduled += 1;
        self.mixer.schedule(source);
    }

    fn set_master_gain_at(&mut self, gain: f32, time: f64) {
        self.mixer.set_gain_at(gain, time);
    }

    fn close(&mut self) {
        self.state = SinkState::Closed;
    }
}
