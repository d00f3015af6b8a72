//! Audio overlay arbitration.
//!
//! At most one overlay clip is relevant at a time, and it never plays over
//! the main video. The overlay's own `play` event pauses the video (not the
//! other way round), so the two elements never race to set `paused`.

/// Where the overlay clip is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    /// No overlay source.
    #[default]
    Idle,
    /// Playback requested, waiting for the `play` event.
    Starting,
    /// The overlay is audible; the video is held paused.
    Playing,
    /// Paused by `stop` or by the video starting.
    Stopped,
    /// Played through to the end.
    Ended,
}

/// Effect the session must carry out on a transport or on `paused`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayDirective {
    /// Load and start this overlay source.
    PlaySource(String),
    /// Resume (or restart, if ended) the loaded overlay.
    Resume,
    /// Pause the overlay in place.
    Pause,
    /// Drop the overlay source.
    Unload,
    /// Pause the main video.
    PauseVideo,
    /// Resume the main video from where it stopped.
    ResumeVideo,
}

/// Tracks the overlay clip and decides how it interacts with the video.
#[derive(Debug, Default)]
pub struct OverlayAudioCoordinator {
    url: String,
    phase: OverlayPhase,
}

impl OverlayAudioCoordinator {
    /// Creates a coordinator with no overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overlay source; empty when none.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Replaces the overlay source. A new source supersedes the previous one
    /// and autoplays; an empty source removes the overlay.
    pub fn set_source(&mut self, url: &str) -> Vec<OverlayDirective> {
        if url.is_empty() {
            return self.clear();
        }
        self.url = url.to_owned();
        self.phase = OverlayPhase::Starting;
        vec![OverlayDirective::PlaySource(self.url.clone())]
    }

    /// Removes the overlay. If it was audible the video gets its turn back.
    pub fn clear(&mut self) -> Vec<OverlayDirective> {
        if self.url.is_empty() {
            return Vec::new();
        }
        let was_playing = self.phase == OverlayPhase::Playing;
        self.url.clear();
        self.phase = OverlayPhase::Idle;
        if was_playing {
            vec![OverlayDirective::Unload, OverlayDirective::ResumeVideo]
        } else {
            vec![OverlayDirective::Unload]
        }
    }

    /// The overlay element started playing.
    pub fn on_play(&mut self) -> Vec<OverlayDirective> {
        if self.url.is_empty() {
            return Vec::new();
        }
        self.phase = OverlayPhase::Playing;
        vec![OverlayDirective::PauseVideo]
    }

    /// The overlay element played to its end.
    pub fn on_ended(&mut self) -> Vec<OverlayDirective> {
        if self.url.is_empty() {
            return Vec::new();
        }
        self.phase = OverlayPhase::Ended;
        vec![OverlayDirective::ResumeVideo]
    }

    /// Makes sure the overlay is playing. Safe to call repeatedly; a clip
    /// that already ended is replayed.
    pub fn ensure_playing(&mut self) -> Vec<OverlayDirective> {
        match self.phase {
            OverlayPhase::Stopped | OverlayPhase::Ended if !self.url.is_empty() => {
                self.phase = OverlayPhase::Starting;
                vec![OverlayDirective::Resume]
            }
            _ => Vec::new(),
        }
    }

    /// Pauses the overlay without resetting its position.
    pub fn stop(&mut self) -> Vec<OverlayDirective> {
        match self.phase {
            OverlayPhase::Starting | OverlayPhase::Playing => {
                self.phase = OverlayPhase::Stopped;
                vec![OverlayDirective::Pause]
            }
            _ => Vec::new(),
        }
    }

    /// The main video started playing; the overlay yields.
    pub fn on_video_play(&mut self) -> Vec<OverlayDirective> {
        self.stop()
    }
}
