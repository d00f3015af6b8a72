//! Progress tracking.
//!
//! Progress is sampled on a fixed cadence rather than on every `timeupdate`,
//! and reconciled against explicit seeks. The tracker only proposes values;
//! the session decides what to write.

/// Inputs for one poll tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Whether the main video is paused.
    pub paused: bool,
    /// Known media duration in seconds.
    pub duration: f64,
    /// Position reported by the transport.
    pub current_time: Option<f64>,
    /// Progress currently stored.
    pub progress: f64,
    /// Seek still waiting for the transport to catch up.
    pub pending_seek: Option<f64>,
    /// Polls already held for `pending_seek`.
    pub held_polls: u32,
    /// Normalized sample taken on the previous tick, if any since the last
    /// seek or node switch.
    pub last_sample: Option<f64>,
}

/// What a poll tick proposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do: paused, duration unknown or no position yet.
    Skip,
    /// The transport has not reached the pending seek target yet; the stored
    /// progress must not be overwritten by the stale sample.
    HoldForSeek,
    /// Store `progress`.
    Update {
        /// The new progress value.
        progress: f64,
        /// The normalized sample this tick took; feed it back as `last_sample`.
        sample: f64,
        /// The transport stood still and progress was nudged forward.
        nudged: bool,
        /// The pending seek (if any) has been reached and can be cleared.
        seek_settled: bool,
    },
    /// The transport never reached the pending seek target within the hold
    /// limit. The seek is dropped and the transport's position is taken.
    SeekAbandoned {
        /// The transport's position, normalized.
        progress: f64,
    },
}

/// Where an explicit seek lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekPlan {
    /// Absolute time to hand to the transport.
    pub time: f64,
    /// Progress to store immediately, when the duration is known.
    pub progress: Option<f64>,
}

/// Turns raw media time into normalized progress.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTracker {
    epsilon: f64,
    seek_tolerance: f64,
    seek_hold_limit: u32,
}

impl ProgressTracker {
    /// Creates a tracker with the given stall nudge, seek tolerance and
    /// number of polls a pending seek may hold progress for.
    #[must_use]
    pub fn new(epsilon: f64, seek_tolerance: f64, seek_hold_limit: u32) -> Self {
        Self {
            epsilon,
            seek_tolerance,
            seek_hold_limit,
        }
    }

    /// Evaluates one poll tick.
    #[must_use]
    pub fn tick(&self, input: &TickInput) -> TickOutcome {
        if input.paused || !has_duration(input.duration) {
            return TickOutcome::Skip;
        }
        let Some(current_time) = input.current_time.filter(|t| t.is_finite()) else {
            return TickOutcome::Skip;
        };

        let sample = (current_time / input.duration).clamp(0.0, 1.0);

        let seek_settled = match input.pending_seek {
            Some(target) if (current_time - target).abs() > self.seek_tolerance => {
                if input.held_polls < self.seek_hold_limit {
                    return TickOutcome::HoldForSeek;
                }
                return TickOutcome::SeekAbandoned { progress: sample };
            }
            Some(_) => true,
            None => false,
        };

        // Exact comparisons: a plateau is the transport standing still.
        #[allow(clippy::float_cmp)]
        let stalled = input.last_sample == Some(sample) || sample == input.progress;
        let rewound = input.last_sample.is_some_and(|last| sample < last);

        let progress = if stalled {
            (input.progress + self.epsilon).min(1.0)
        } else if rewound {
            sample
        } else {
            sample.max(input.progress)
        };
        TickOutcome::Update {
            progress,
            sample,
            nudged: stalled,
            seek_settled,
        }
    }

    /// Plans an explicit seek to `target` seconds. Returns `None` for a
    /// non-finite target.
    #[must_use]
    pub fn seek(&self, target: f64, duration: f64) -> Option<SeekPlan> {
        if !target.is_finite() {
            return None;
        }
        let time = if has_duration(duration) {
            target.clamp(0.0, duration)
        } else {
            target.max(0.0)
        };
        Some(SeekPlan {
            time,
            progress: has_duration(duration).then(|| time / duration),
        })
    }
}

fn has_duration(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Formats seconds as `mm:ss`. Unknown, zero and negative times render as
/// `00:00`.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_owned();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(1e-10, 0.25, 40)
    }

    fn playing(current_time: f64, progress: f64) -> TickInput {
        TickInput {
            paused: false,
            duration: 100.0,
            current_time: Some(current_time),
            progress,
            pending_seek: None,
            held_polls: 0,
            last_sample: None,
        }
    }

    fn updated(outcome: TickOutcome) -> f64 {
        match outcome {
            TickOutcome::Update { progress, .. } => progress,
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn test_tick_skips_when_paused_or_duration_unknown() {
        let mut paused = playing(10.0, 0.0);
        paused.paused = true;
        let mut no_duration = playing(10.0, 0.0);
        no_duration.duration = 0.0;
        let mut no_time = playing(10.0, 0.0);
        no_time.current_time = None;

        assert_eq!(tracker().tick(&paused), TickOutcome::Skip);
        assert_eq!(tracker().tick(&no_duration), TickOutcome::Skip);
        assert_eq!(tracker().tick(&no_time), TickOutcome::Skip);
    }

    #[test]
    fn test_tick_is_monotonic_for_increasing_time() {
        let tracker = tracker();
        let mut progress = 0.0;

        for step in 1..=200 {
            let next = updated(tracker.tick(&playing(f64::from(step) * 0.37, progress)));
            assert!(next >= progress, "progress regressed at step {step}");
            progress = next;
        }
    }

    #[test]
    fn test_tick_nudges_identical_samples() {
        // Arrange
        let tracker = tracker();
        let first = updated(tracker.tick(&playing(42.31, 0.0)));

        // Act
        let outcome = tracker.tick(&playing(42.31, first));

        // Assert
        match outcome {
            TickOutcome::Update {
                progress, nudged, ..
            } => {
                assert!(nudged);
                assert!(progress > first);
                assert!(progress < first + 1e-4);
                assert_eq!(format!("{progress:.2}"), format!("{first:.2}"));
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn test_tick_keeps_advancing_while_transport_stands_still() {
        // Arrange
        let tracker = tracker();
        let mut input = playing(42.31, 0.0);
        let mut seen = Vec::new();

        // Act
        for _ in 0..6 {
            match tracker.tick(&input) {
                TickOutcome::Update {
                    progress, sample, ..
                } => {
                    seen.push(progress);
                    input.progress = progress;
                    input.last_sample = Some(sample);
                }
                other => panic!("expected Update, got {other:?}"),
            }
        }

        // Assert
        for pair in seen.windows(2) {
            assert!(pair[1] > pair[0], "progress regressed: {pair:?}");
        }
        assert!(seen[5] < seen[0] + 1e-4);
    }

    #[test]
    fn test_tick_follows_transport_moving_backwards() {
        let mut input = playing(5.0, 0.9);
        input.last_sample = Some(0.9);

        assert!((updated(tracker().tick(&input)) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_tick_abandons_seek_after_hold_limit() {
        let mut waiting = playing(58.0, 0.6);
        waiting.pending_seek = Some(60.0);
        waiting.held_polls = 39;
        let mut exhausted = waiting;
        exhausted.held_polls = 40;

        assert_eq!(tracker().tick(&waiting), TickOutcome::HoldForSeek);
        assert_eq!(
            tracker().tick(&exhausted),
            TickOutcome::SeekAbandoned { progress: 0.58 }
        );
    }

    #[test]
    fn test_tick_holds_until_transport_reaches_seek() {
        let mut stale = playing(10.0, 0.6);
        stale.pending_seek = Some(60.0);
        let mut arrived = playing(60.1, 0.6);
        arrived.pending_seek = Some(60.0);

        assert_eq!(tracker().tick(&stale), TickOutcome::HoldForSeek);
        match tracker().tick(&arrived) {
            TickOutcome::Update { seek_settled, .. } => assert!(seek_settled),
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn test_seek_to_zero_is_a_real_seek() {
        let plan = tracker().seek(0.0, 100.0).unwrap();

        assert!(plan.time.abs() < f64::EPSILON);
        assert_eq!(plan.progress, Some(0.0));
    }

    #[test]
    fn test_seek_clamps_and_defers_progress_without_duration() {
        let clamped = tracker().seek(250.0, 100.0).unwrap();
        let unknown = tracker().seek(30.0, 0.0).unwrap();

        assert!((clamped.time - 100.0).abs() < f64::EPSILON);
        assert_eq!(clamped.progress, Some(1.0));
        assert!((unknown.time - 30.0).abs() < f64::EPSILON);
        assert_eq!(unknown.progress, None);
        assert_eq!(tracker().seek(f64::NAN, 100.0), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(65.9), "01:05");
        assert_eq!(format_time(600.0), "10:00");
    }
}
