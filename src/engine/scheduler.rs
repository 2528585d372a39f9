use crate::engine::guard::VoiceId;

/// Deferred work the engine runs once the clock passes a due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// A strum or arpeggio has rung out; release its voice.
    PlaybackFinished(VoiceId),
}

/// Cancels one queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TaskHandle,
    due: f64,
    task: Task,
}

/// Timed task queue driven by the engine clock.
///
/// Nothing fires by itself: `tick(now)` hands back whatever is due, in due
/// order, and the engine acts on it. Cancelled tasks never come back out.
#[derive(Debug, Default)]
pub struct TaskScheduler {
    next_handle: u64,
    pending: Vec<Pending>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, due: f64, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        // Keep sorted by due time, ties in enqueue order
        let index = self.pending.partition_point(|pending| pending.due <= due);
        self.pending.insert(index, Pending { handle, due, task });
        handle
    }

    /// Returns `false` when the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return every task due at or before `now`.
    pub fn tick(&mut self, now: f64) -> Vec<Task> {
        let due = self.pending.partition_point(|pending| pending.due <= now);
        self.pending.drain(..due).map(|pending| pending.task).collect()
    }

    /// Cancel everything. Returns how many tasks were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
