//! Playback timings and defaults.

use std::time::Duration;

/// Tunables for a playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Cadence of the progress poll.
    pub poll_interval: Duration,
    /// Delay between a navigation decision and the node switch.
    pub settle_delay: Duration,
    /// How long `animating` stays set after a switch.
    pub animation_window: Duration,
    /// How long `blinking` stays set.
    pub blink_decay: Duration,
    /// Amount progress is nudged by when two samples are identical.
    pub stall_epsilon: f64,
    /// How close (seconds) the transport must get to a seek target before
    /// poll samples are trusted again.
    pub seek_tolerance: f64,
    /// Polls a seek may hold progress for before the transport's own
    /// position is taken instead.
    pub seek_hold_polls: u32,
    /// Where the viewer is sent when the sequence terminates.
    pub redirect_target: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            settle_delay: Duration::from_millis(500),
            animation_window: Duration::from_millis(400),
            blink_decay: Duration::from_millis(500),
            stall_epsilon: 1e-10,
            seek_tolerance: 0.25,
            seek_hold_polls: 40,
            redirect_target: "/dashboard".to_owned(),
        }
    }
}
