//! Deferred, cancellable tasks.
//!
//! Every time-driven behavior of a session (poll ticks, settle delay,
//! animation and blink decay) is an entry here, tagged with the activation
//! epoch it was scheduled under. Nothing blocks; the session pops due
//! entries when it is pumped.

use chrono::{DateTime, Utc};
use videoask_graph::domain::resolver::ResolvedOutcome;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Work a session defers.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Sample the transport and update progress.
    PollProgress,
    /// Carry out a resolved navigation once the transition window elapses.
    SettleNavigation(ResolvedOutcome),
    /// End the post-switch animation window.
    ClearAnimation,
    /// End the blink emphasis.
    ClearBlink,
}

#[derive(Debug)]
struct Entry {
    id: TaskId,
    due: DateTime<Utc>,
    epoch: u64,
    task: DeferredTask,
}

/// Timer queue owned by a single session.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to run at `due` on behalf of activation `epoch`.
    pub fn schedule(&mut self, due: DateTime<Utc>, epoch: u64, task: DeferredTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due,
            epoch,
            task,
        });
        id
    }

    /// Cancels one task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Cancels every task scheduled under an epoch older than `epoch`.
    /// Returns how many were dropped.
    pub fn cancel_before_epoch(&mut self, epoch: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.epoch >= epoch);
        before - self.entries.len()
    }

    /// Cancels everything.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns the earliest task due at or before `now`. Ties
    /// run in scheduling order.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<DeferredTask> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.id.0))
            .map(|(index, _)| index)?;
        Some(self.entries.swap_remove(index).task)
    }

    /// When the next task falls due.
    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
