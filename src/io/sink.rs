use std::fmt;

use crate::graph::{node::RenderCtx, GraphNode};

/// A note buffer waiting for its start time, plus the tone chain it plays through.
///
/// The samples are synthesized up front; the graph runs block by block as
/// the mixer reaches them.
pub struct ScheduledSource {
    /// Engine clock time in seconds.
    pub start_time: f64,
    pub samples: Vec<f32>,
    pub graph: Box<dyn GraphNode>,
    pub ctx: RenderCtx,
}

impl ScheduledSource {
    pub fn new(
        start_time: f64,
        samples: Vec<f32>,
        graph: Box<dyn GraphNode>,
        ctx: RenderCtx,
    ) -> Self {
        Self {
            start_time,
            samples,
            graph,
            ctx,
        }
    }

    /// Length in seconds at the source's sample rate.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.ctx.sample_rate as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Created but not yet resumed. The clock does not run and nothing is heard.
    Suspended,
    Running,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// No output device to open.
    NoDevice,
    /// The output path refused to start.
    Unavailable,
    /// Error reported by the audio backend.
    Backend(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::NoDevice => write!(f, "no audio output device available"),
            SinkError::Unavailable => write!(f, "audio output is unavailable"),
            SinkError::Backend(message) => write!(f, "audio backend error: {}", message),
        }
    }
}

impl std::error::Error for SinkError {}

/// The operations the engine needs from an audio output.
///
/// Implementations own a clock that only moves while the sink is running,
/// and a master gain that every scheduled source passes through.
pub trait AudioSink {
    fn sample_rate(&self) -> f32;

    /// Seconds of audio rendered since the sink was created.
    fn current_time(&self) -> f64;

    fn state(&self) -> SinkState;

    /// Start (or restart) output. Safe to call when already running.
    fn resume(&mut self) -> Result<(), SinkError>;

    /// Queue a source to start at its `start_time`. Sources whose start time
    /// has already passed begin immediately.
    fn schedule_source(&mut self, source: ScheduledSource);

    /// Step the master gain to `gain` at clock `time`.
    fn set_master_gain_at(&mut self, gain: f32, time: f64);

    /// Stop output for good and release the device.
    fn close(&mut self);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn sample_rate(&self) -> f32 {
        (**self).sample_rate()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn state(&self) -> SinkState {
        (**self).state()
    }

    fn resume(&mut self) -> Result<(), SinkError> {
        (**self).resume()
    }

    fn schedule_source(&mut self, source: ScheduledSource) {
        (**self).schedule_source(source)
    }

    fn set_master_gain_at(&mut self, gain: f32, time: f64) {
        (**self).set_master_gain_at(gain, time)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
