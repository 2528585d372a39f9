use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    io::{
        mixer::{Mixer, SinkMessage},
        sink::{AudioSink, ScheduledSource, SinkError, SinkState},
    },
    MAX_BLOCK_SIZE,
};

/*
Realtime Output
===============

The mixer lives on the audio callback thread. The engine never touches it
directly; it pushes SinkMessages into a lock-free ring buffer and the callback
drains them at the top of every block:

  engine thread                           audio callback
  ─────────────                           ──────────────
  schedule_source ──→ [rtrb ring] ──→ pop all → mixer.render → interleave
  set_master_gain ──↗                                  │
                                                       ↓
  current_time ←──────── [AtomicU64 frames] ←──── publish clock

The stream is built paused, so nothing is audible until resume().
*/

const MESSAGE_CAPACITY: usize = 1024;

/// Sink backed by the default cpal output device.
pub struct CpalSink {
    stream: cpal::Stream,
    tx: Producer<SinkMessage>,
    frames: Arc<AtomicU64>,
    sample_rate: f32,
    state: SinkState,
}

impl CpalSink {
    /// Open the default output device. The stream starts suspended.
    pub fn new() -> Result<Self, SinkError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SinkError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|err| SinkError::Backend(err.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (tx, rx) = RingBuffer::<SinkMessage>::new(MESSAGE_CAPACITY);
        let frames = Arc::new(AtomicU64::new(0));
        let mut callback = Callback {
            mixer: Mixer::new(sample_rate, 1.0),
            rx,
            frames: Arc::clone(&frames),
            block: vec![0.0; MAX_BLOCK_SIZE],
            channels,
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| callback.process(data),
                |err| log::error!(target: "fretsynth::sink", "audio stream error: {}", err),
                None,
            )
            .map_err(|err| SinkError::Backend(err.to_string()))?;

        // Some hosts start streams on build
        stream
            .pause()
            .map_err(|err| SinkError::Backend(err.to_string()))?;

        log::info!(
            target: "fretsynth::sink",
            "opened output device at {} Hz, {} channels",
            sample_rate,
            channels
        );

        Ok(Self {
            stream,
            tx,
            frames,
            sample_rate,
            state: SinkState::Suspended,
        })
    }

    fn send(&mut self, message: SinkMessage) {
        if self.tx.push(message).is_err() {
            log::warn!(target: "fretsynth::sink", "sink message queue full, dropping message");
        }
    }
}

impl AudioSink for CpalSink {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn state(&self) -> SinkState {
        self.state
    }

    fn resume(&mut self) -> Result<(), SinkError> {
        match self.state {
            SinkState::Running => Ok(()),
            SinkState::Closed => Err(SinkError::Unavailable),
            SinkState::Suspended => {
                self.stream
                    .play()
                    .map_err(|err| SinkError::Backend(err.to_string()))?;
                self.state = SinkState::Running;
                log::info!(target: "fretsynth::sink", "output stream running");
                Ok(())
            }
        }
    }

    fn schedule_source(&mut self, source: ScheduledSource) {
        if self.state == SinkState::Closed {
            return;
        }
        self.send(SinkMessage::Schedule(source));
    }

    fn set_master_gain_at(&mut self, gain: f32, time: f64) {
        self.send(SinkMessage::MasterGain { gain, time });
    }

    fn close(&mut self) {
        if self.state == SinkState::Closed {
            return;
        }
        if let Err(err) = self.stream.pause() {
            log::warn!(target: "fretsynth::sink", "failed to pause stream on close: {}", err);
        }
        self.state = SinkState::Closed;
        log::info!(target: "fretsynth::sink", "output stream closed");
    }
}

/// State moved into the audio callback.
struct Callback {
    mixer: Mixer,
    rx: Consumer<SinkMessage>,
    frames: Arc<AtomicU64>,
    block: Vec<f32>,
    channels: usize,
}

impl Callback {
    fn process(&mut self, data: &mut [f32]) {
        while let Ok(message) = self.rx.pop() {
            self.mixer.handle(message);
        }

        let total_frames = data.len() / self.channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block = &mut self.block[..frames_to_render];
            self.mixer.render(block);

            // Mono to all channels
            let out_off = frames_written * self.channels;
            for (i, &sample) in block.iter().enumerate() {
                let frame = out_off + i * self.channels;
                data[frame..frame + self.channels].fill(sample);
            }

            frames_written += frames_to_render;
        }

        self.frames.store(self.mixer.frame(), Ordering::Release);
    }
}
