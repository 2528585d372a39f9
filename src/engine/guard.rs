/*
Playback Guard
==============

A strum or arpeggio is one logical voice. The guard decides whether a new one
may start while others are still sounding.

  SingleVoice   at most one at a time. A second request while the first
                is held is rejected outright (nothing is queued).
  VoicePool(n)  up to n at once.

A held voice moves through

    Idle ──acquire──→ Scheduled ──clock reaches start──→ Playing ──release──→ Idle

Release is explicit. The engine queues a "playback finished" task for the
voice's end time, and `stop()` cancels those tasks and releases everything
at once, so a finished transition can never fire after a stop.

Each held voice also remembers its end time. An acquire at or past that time
reclaims the slot even if the release never arrived.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    /// Held, first note not reached yet.
    Scheduled,
    Playing,
}

pub trait PlaybackGuard {
    /// Claim a voice for a playback sounding from `starts_at` to `ends_at`.
    /// Voices whose end time is at or before `now` are reclaimed first.
    /// `None` means the request is rejected.
    fn try_acquire(&mut self, now: f64, starts_at: f64, ends_at: f64) -> Option<VoiceId>;

    /// Returns `false` if the voice was not held.
    fn release(&mut self, voice: VoiceId) -> bool;

    fn release_all(&mut self);

    fn state(&self, voice: VoiceId, now: f64) -> VoiceState;

    /// True while any voice is held.
    fn is_busy(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct HeldVoice {
    id: VoiceId,
    starts_at: f64,
    ends_at: f64,
}

impl HeldVoice {
    fn expired(&self, now: f64) -> bool {
        now >= self.ends_at
    }

    fn state(&self, now: f64) -> VoiceState {
        if now < self.starts_at {
            VoiceState::Scheduled
        } else {
            VoiceState::Playing
        }
    }
}

/// One playback at a time.
#[derive(Debug, Default)]
pub struct SingleVoice {
    next_id: u64,
    held: Option<HeldVoice>,
}

impl SingleVoice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaybackGuard for SingleVoice {
    fn try_acquire(&mut self, now: f64, starts_at: f64, ends_at: f64) -> Option<VoiceId> {
        if self.held.is_some_and(|held| held.expired(now)) {
            self.held = None;
        }
        if self.held.is_some() {
            return None;
        }

        let id = VoiceId(self.next_id);
        self.next_id += 1;
        self.held = Some(HeldVoice {
            id,
            starts_at,
            ends_at,
        });
        Some(id)
    }

    fn release(&mut self, voice: VoiceId) -> bool {
        match self.held {
            Some(held) if held.id == voice => {
                self.held = None;
                true
            }
            _ => false,
        }
    }

    fn release_all(&mut self) {
        self.held = None;
    }

    fn state(&self, voice: VoiceId, now: f64) -> VoiceState {
        match self.held {
            Some(held) if held.id == voice => held.state(now),
            _ => VoiceState::Idle,
        }
    }

    fn is_busy(&self) -> bool {
        self.held.is_some()
    }
}

/// Up to `max` overlapping playbacks.
#[derive(Debug)]
pub struct VoicePool {
    max: usize,
    next_id: u64,
    held: Vec<HeldVoice>,
}

impl VoicePool {
    pub fn new(max: usize) -> Self {
        let max = max.max(1);
        Self {
            max,
            next_id: 0,
            held: Vec::with_capacity(max),
        }
    }

    pub fn capacity(&self) -> usize {
        self.max
    }

    pub fn active(&self) -> usize {
        self.held.len()
    }
}

impl PlaybackGuard for VoicePool {
    fn try_acquire(&mut self, now: f64, starts_at: f64, ends_at: f64) -> Option<VoiceId> {
        self.held.retain(|held| !held.expired(now));
        if self.held.len() >= self.max {
            return None;
        }

        let id = VoiceId(self.next_id);
        self.next_id += 1;
        self.held.push(HeldVoice {
            id,
            starts_at,
            ends_at,
        });
        Some(id)
    }

    fn release(&mut self, voice: VoiceId) -> bool {
        let before = self.held.len();
        self.held.retain(|held| held.id != voice);
        self.held.len() != before
    }

    fn release_all(&mut self) {
        self.held.clear();
    }

    fn state(&self, voice: VoiceId, now: f64) -> VoiceState {
        self.held
            .iter()
            .find(|held| held.id == voice)
            .map_or(VoiceState::Idle, |held| held.state(now))
    }

    fn is_busy(&self) -> bool {
        !self.held.is_empty()
    }
}
