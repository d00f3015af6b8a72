//! Wall-clock time derived from tokio's timer.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;
use videoask_core::clock::Clock;

/// A `Clock` anchored to the wall clock at construction and advanced by
/// tokio's `Instant`, so a paused test runtime moves it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin_wall: DateTime<Utc>,
    origin: Instant,
}

impl TokioClock {
    /// Anchors a new clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin_wall: Utc::now(),
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.origin.elapsed())
            .map_or(self.origin_wall, |elapsed| self.origin_wall + elapsed)
    }
}
