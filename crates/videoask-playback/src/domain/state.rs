//! Authoritative playback state and the snapshots published from it.

use serde::{Serialize, Serializer};
use uuid::Uuid;
use videoask_graph::domain::node::Node;

/// The playback speeds a viewer can cycle through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRate {
    /// 1x
    #[default]
    Normal,
    /// 1.5x
    OneAndHalf,
    /// 2x
    Double,
}

impl PlaybackRate {
    /// The next speed, wrapping from 2x back to 1x.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::OneAndHalf,
            Self::OneAndHalf => Self::Double,
            Self::Double => Self::Normal,
        }
    }

    /// The multiplier handed to the transport.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }
}

impl Serialize for PlaybackRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.multiplier())
    }
}

/// The single authoritative playback state. Only `PlaybackSession` writes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// The node currently rendering.
    pub active_node: Node,
    /// Whether the main video is paused.
    pub paused: bool,
    /// Normalized position in `[0, 1]`. Meaningless while `duration` is 0.
    pub progress: f64,
    /// Last observed media duration in seconds; 0 until known.
    pub duration: f64,
    /// Absolute seek target in seconds awaiting reconciliation.
    pub seek_target: Option<f64>,
    /// Whether the main video is muted.
    pub muted: bool,
    /// Whether presentation is fullscreen.
    pub fullscreen: bool,
    /// Current playback speed.
    pub playback_rate: PlaybackRate,
    /// Whether the active clip is taller than it is wide.
    pub is_portrait: bool,
    /// Set for a short window after a node switch.
    pub animating: bool,
    /// Set for a short window after `trigger_blink`.
    pub blinking: bool,
    /// Source of the audio overlay; empty when none is active.
    pub audio_overlay_url: String,
    /// Last transport-reported failure for the active node.
    pub media_error: Option<String>,
}

impl PlaybackState {
    pub(crate) fn new(active_node: Node) -> Self {
        Self {
            active_node,
            paused: false,
            progress: 0.0,
            duration: 0.0,
            seek_target: None,
            muted: false,
            fullscreen: false,
            playback_rate: PlaybackRate::Normal,
            is_portrait: false,
            animating: false,
            blinking: false,
            audio_overlay_url: String::new(),
            media_error: None,
        }
    }

    /// Swaps in `node` and clears everything scoped to the previous node.
    /// Viewer preferences (mute, fullscreen, rate) carry over.
    pub(crate) fn activate(&mut self, node: Node) {
        self.paused = node.is_placeholder();
        self.active_node = node;
        self.progress = 0.0;
        self.duration = 0.0;
        self.seek_target = None;
        self.is_portrait = false;
        self.animating = false;
        self.blinking = false;
        self.audio_overlay_url.clear();
        self.media_error = None;
    }
}

/// Lifecycle of a session as seen by presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SessionPhase {
    /// Accepting commands.
    Active,
    /// The sequence ended; presentation should navigate away.
    #[serde(rename_all = "camelCase")]
    Terminated {
        /// External path handed to the navigator.
        redirect_to: String,
    },
    /// The owner tore the session down.
    TornDown,
}

/// Immutable view published after every state-changing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// The session this snapshot belongs to.
    pub session_id: Uuid,
    /// Increases by one with every published change.
    pub sequence: u64,
    /// Session lifecycle.
    pub phase: SessionPhase,
    /// Copy of the playback state.
    pub state: PlaybackState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_cycles_through_allowed_multipliers() {
        let rate = PlaybackRate::default();

        let first = rate.next();
        let second = first.next();
        let third = second.next();

        assert_eq!(
            [first.multiplier(), second.multiplier(), third.multiplier()],
            [1.5, 2.0, 1.0]
        );
    }

    #[test]
    fn test_activate_resets_node_scoped_fields() {
        // Arrange
        let mut state = PlaybackState::new(Node::new("a", "A", "a.mp4", vec![]));
        state.progress = 0.7;
        state.duration = 12.0;
        state.seek_target = Some(3.0);
        state.blinking = true;
        state.muted = true;
        state.playback_rate = PlaybackRate::Double;
        state.audio_overlay_url = "hint.mp3".to_owned();

        // Act
        state.activate(Node::new("b", "B", "b.mp4", vec![]));

        // Assert
        assert_eq!(state.active_node.id, "b");
        assert!(state.progress.abs() < f64::EPSILON);
        assert!(state.duration.abs() < f64::EPSILON);
        assert_eq!(state.seek_target, None);
        assert!(!state.blinking);
        assert!(state.audio_overlay_url.is_empty());
        assert!(state.muted);
        assert_eq!(state.playback_rate, PlaybackRate::Double);
        assert!(!state.paused);
    }

    #[test]
    fn test_activate_placeholder_pauses() {
        let mut state = PlaybackState::new(Node::new("a", "A", "a.mp4", vec![]));

        state.activate(Node::placeholder());

        assert!(state.paused);
    }

    #[test]
    fn test_snapshot_serializes_camel_case_with_rate_multiplier() {
        let mut state = PlaybackState::new(Node::new("a", "A", "a.mp4", vec![]));
        state.playback_rate = PlaybackRate::OneAndHalf;
        let snapshot = PlaybackSnapshot {
            session_id: Uuid::nil(),
            sequence: 3,
            phase: SessionPhase::Terminated {
                redirect_to: "/dashboard".to_owned(),
            },
            state,
        };

        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["state"]["playbackRate"], 1.5);
        assert_eq!(json["state"]["activeNode"]["id"], "a");
        assert_eq!(json["phase"]["status"], "terminated");
        assert_eq!(json["phase"]["redirectTo"], "/dashboard");
    }
}
