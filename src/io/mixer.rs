use std::collections::VecDeque;

use crate::{dsp::amplify::add_into, io::sink::ScheduledSource, MAX_BLOCK_SIZE};

/*
Mixer
=====

The mixer is the part of every sink that actually makes sound. It owns:

  clock        frames rendered so far (time = frame / sample_rate)
  sources      scheduled notes, started when the clock reaches them
  master gain  one gain applied to the summed output, with timed changes

Per block:

  1. every source overlapping the block copies its next samples into a
     scratch buffer, runs them through its tone graph and adds them in
  2. finished sources are dropped
  3. the master gain is applied sample by sample, switching to a queued
     value exactly on its frame
  4. the clock advances by the block length

A source can start partway into a block; its first sample lands on its own
start frame, not at the top of the block.
*/

/// Control messages from the engine thread to whoever runs the mixer.
pub enum SinkMessage {
    Schedule(ScheduledSource),
    MasterGain { gain: f32, time: f64 },
}

struct ActiveSource {
    start_frame: u64,
    position: usize,
    source: ScheduledSource,
}

impl ActiveSource {
    fn remaining(&self) -> usize {
        self.source.samples.len() - self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GainEvent {
    frame: u64,
    gain: f32,
}

pub struct Mixer {
    sample_rate: f32,
    frame: u64,
    sources: Vec<ActiveSource>,
    gain: f32,
    gain_events: VecDeque<GainEvent>,
    scratch: Vec<f32>,
}

impl Mixer {
    pub fn new(sample_rate: f32, gain: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            sources: Vec::new(),
            gain: gain.max(0.0),
            gain_events: VecDeque::new(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn current_time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Gain currently applied to the output.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn active_sources(&self) -> usize {
        self.sources.len()
    }

    fn frame_at(&self, time: f64) -> u64 {
        (time.max(0.0) * self.sample_rate as f64).round() as u64
    }

    pub fn schedule(&mut self, source: ScheduledSource) {
        let start_frame = self.frame_at(source.start_time).max(self.frame);
        self.sources.push(ActiveSource {
            start_frame,
            position: 0,
            source,
        });
    }

    /// A change at or before the current frame applies immediately and
    /// discards changes still queued. Later changes queue in time order.
    pub fn set_gain_at(&mut self, gain: f32, time: f64) {
        let gain = gain.max(0.0);
        let frame = self.frame_at(time);

        if frame <= self.frame {
            self.gain = gain;
            self.gain_events.clear();
            return;
        }

        let index = self.gain_events.partition_point(|event| event.frame <= frame);
        self.gain_events.insert(index, GainEvent { frame, gain });
    }

    pub fn handle(&mut self, message: SinkMessage) {
        match message {
            SinkMessage::Schedule(source) => self.schedule(source),
            SinkMessage::MasterGain { gain, time } => self.set_gain_at(gain, time),
        }
    }

    /// Render the next `out.len()` frames, advancing the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let block_start = self.frame;
        let block_end = block_start + out.len() as u64;

        for active in &mut self.sources {
            if active.start_frame >= block_end {
                continue;
            }

            let offset = active.start_frame.saturating_sub(block_start) as usize;
            let len = active.remaining().min(out.len() - offset);
            if len == 0 {
                continue;
            }

            let scratch = &mut self.scratch[..len];
            scratch.copy_from_slice(
                &active.source.samples[active.position..active.position + len],
            );
            let time = (block_start + offset as u64) as f64 / self.sample_rate as f64;
            let ctx = active.source.ctx.at_time(time);
            active.source.graph.render_block(scratch, &ctx);
            add_into(&mut out[offset..offset + len], scratch);
            active.position += len;
        }

        self.sources.retain(|active| active.remaining() > 0);

        for (i, sample) in out.iter_mut().enumerate() {
            let frame = block_start + i as u64;
            while let Some(event) = self.gain_events.front() {
                if event.frame > frame {
                    break;
                }
                self.gain = event.gain;
                self.gain_events.pop_front();
            }
            *sample *= self.gain;
        }

        self.frame = block_end;
    }
}
