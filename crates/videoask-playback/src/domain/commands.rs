//! Commands for the playback context.

use videoask_core::command::{Command, Envelope};

/// Everything a host can ask a session to do: viewer intents and transport
/// notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Flip between playing and paused.
    TogglePlayPause,
    /// Set the mute flag.
    SetMuted(bool),
    /// Set the fullscreen flag.
    SetFullscreen(bool),
    /// Flip the mute flag.
    ToggleMuted,
    /// Flip the fullscreen flag.
    ToggleFullscreen,
    /// Advance to the next playback speed.
    CyclePlaybackRate,
    /// Transport learned the media duration.
    ReportMediaDuration(f64),
    /// Transport derived the clip orientation.
    ReportPortrait(bool),
    /// Transport loaded metadata with these intrinsic dimensions.
    ReportIntrinsicSize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Jump to an absolute time in seconds.
    RequestSeek(f64),
    /// Follow a question. `None` ends the sequence.
    Navigate(Option<String>),
    /// Briefly emphasize the surface.
    TriggerBlink,
    /// Replace the overlay source; empty removes it.
    SetAudioOverlay(String),
    /// Ensure the overlay is playing.
    StartAudio,
    /// Same as `StartAudio`; kept for tap-to-replay controls.
    ToggleAudioPlay,
    /// Pause the overlay in place.
    StopAudio,
    /// Overlay element fired `play`.
    OverlayPlayed,
    /// Overlay element fired `ended`.
    OverlayEnded,
    /// Main video fired `play`.
    VideoPlayed,
    /// Transport could not play the active source.
    ReportMediaError(String),
    /// End the session.
    Teardown,
}

impl SessionCommand {
    /// Stable name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TogglePlayPause => "toggle_play_pause",
            Self::SetMuted(_) => "set_muted",
            Self::SetFullscreen(_) => "set_fullscreen",
            Self::ToggleMuted => "toggle_muted",
            Self::ToggleFullscreen => "toggle_fullscreen",
            Self::CyclePlaybackRate => "cycle_playback_rate",
            Self::ReportMediaDuration(_) => "report_media_duration",
            Self::ReportPortrait(_) => "report_portrait",
            Self::ReportIntrinsicSize { .. } => "report_intrinsic_size",
            Self::RequestSeek(_) => "request_seek",
            Self::Navigate(_) => "navigate",
            Self::TriggerBlink => "trigger_blink",
            Self::SetAudioOverlay(_) => "set_audio_overlay",
            Self::StartAudio => "start_audio",
            Self::ToggleAudioPlay => "toggle_audio_play",
            Self::StopAudio => "stop_audio",
            Self::OverlayPlayed => "overlay_played",
            Self::OverlayEnded => "overlay_ended",
            Self::VideoPlayed => "video_played",
            Self::ReportMediaError(_) => "report_media_error",
            Self::Teardown => "teardown",
        }
    }
}

/// A `SessionCommand` plus the correlation id it travels under.
pub type CommandEnvelope = Envelope<SessionCommand>;

impl Command for SessionCommand {
    fn command_type(&self) -> &'static str {
        self.name()
    }
}
