//! Command handlers for the playback context.
//!
//! Translates a `CommandEnvelope` into the matching `PlaybackSession`
//! operation. Commands against a closed session are rejected here so hosts
//! can tell a no-op from a refusal.

use tracing::debug;
use videoask_core::error::PlaybackError;
use videoask_graph::domain::resolver::ResolvedOutcome;

use crate::domain::commands::{CommandEnvelope, SessionCommand};
use crate::domain::session::PlaybackSession;
use crate::domain::state::PlaybackRate;

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The command was applied; the new state is in the next snapshot.
    Applied,
    /// A navigation was resolved.
    Navigated(ResolvedOutcome),
    /// The playback speed changed to this rate.
    RateChanged(PlaybackRate),
}

/// Applies one command to `session`.
///
/// # Errors
///
/// Returns `PlaybackError::SessionClosed` if the session has terminated or
/// been torn down.
/// Returns `PlaybackError::Validation` for a non-finite seek or duration.
pub fn handle(
    session: &mut PlaybackSession,
    envelope: &CommandEnvelope,
) -> Result<CommandOutcome, PlaybackError> {
    debug!(
        session_id = %session.id(),
        correlation_id = %envelope.correlation_id,
        command = envelope.command_type(),
        "handling command"
    );

    if !session.is_active() {
        return Err(PlaybackError::SessionClosed);
    }

    let outcome = match &envelope.command {
        SessionCommand::TogglePlayPause => {
            session.toggle_play_pause();
            CommandOutcome::Applied
        }
        SessionCommand::SetMuted(muted) => {
            session.set_muted(*muted);
            CommandOutcome::Applied
        }
        SessionCommand::SetFullscreen(fullscreen) => {
            session.set_fullscreen(*fullscreen);
            CommandOutcome::Applied
        }
        SessionCommand::ToggleMuted => {
            session.toggle_muted();
            CommandOutcome::Applied
        }
        SessionCommand::ToggleFullscreen => {
            session.toggle_fullscreen();
            CommandOutcome::Applied
        }
        SessionCommand::CyclePlaybackRate => {
            CommandOutcome::RateChanged(session.cycle_playback_rate())
        }
        SessionCommand::ReportMediaDuration(seconds) => {
            if seconds.is_nan() {
                return Err(PlaybackError::Validation(
                    "duration must be a number".to_owned(),
                ));
            }
            session.report_media_duration(*seconds);
            CommandOutcome::Applied
        }
        SessionCommand::ReportPortrait(portrait) => {
            session.report_portrait(*portrait);
            CommandOutcome::Applied
        }
        SessionCommand::ReportIntrinsicSize { width, height } => {
            session.report_intrinsic_size(*width, *height);
            CommandOutcome::Applied
        }
        SessionCommand::RequestSeek(seconds) => {
            if !seconds.is_finite() {
                return Err(PlaybackError::Validation(format!(
                    "seek target must be finite, got {seconds}"
                )));
            }
            session.request_seek(*seconds);
            CommandOutcome::Applied
        }
        SessionCommand::Navigate(target) => {
            CommandOutcome::Navigated(session.navigate(target.as_deref()))
        }
        SessionCommand::TriggerBlink => {
            session.trigger_blink();
            CommandOutcome::Applied
        }
        SessionCommand::SetAudioOverlay(url) => {
            session.set_audio_overlay(url);
            CommandOutcome::Applied
        }
        SessionCommand::StartAudio => {
            session.start_audio();
            CommandOutcome::Applied
        }
        SessionCommand::ToggleAudioPlay => {
            session.toggle_audio_play();
            CommandOutcome::Applied
        }
        SessionCommand::StopAudio => {
            session.stop_audio();
            CommandOutcome::Applied
        }
        SessionCommand::OverlayPlayed => {
            session.on_overlay_play();
            CommandOutcome::Applied
        }
        SessionCommand::OverlayEnded => {
            session.on_overlay_ended();
            CommandOutcome::Applied
        }
        SessionCommand::VideoPlayed => {
            session.on_video_play();
            CommandOutcome::Applied
        }
        SessionCommand::ReportMediaError(reason) => {
            session.report_media_error(reason);
            CommandOutcome::Applied
        }
        SessionCommand::Teardown => {
            session.teardown();
            CommandOutcome::Applied
        }
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::PlaybackConfig;
    use crate::domain::session::SessionPorts;
    use videoask_graph::domain::node::{Node, Question};
    use videoask_test_support::{
        FixedClock, RecordingNavigator, RecordingOverlay, RecordingTransport, TransportCall,
    };

    fn session_with(video: Arc<RecordingTransport>) -> PlaybackSession {
        let clock = FixedClock(chrono::Utc::now());
        let ports = SessionPorts {
            clock: Arc::new(clock),
            video,
            overlay: Arc::new(RecordingOverlay::new()),
            navigator: Arc::new(RecordingNavigator::new()),
        };
        let nodes = vec![
            Node::new("intro", "Intro", "intro.mp4", vec![Question::terminal("Bye")]),
        ];
        PlaybackSession::initialize(nodes, PlaybackConfig::default(), ports).unwrap()
    }

    #[test]
    fn test_handle_dispatches_to_session() {
        // Arrange
        let video = Arc::new(RecordingTransport::new());
        let mut session = session_with(video.clone());

        // Act
        let rate = handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::CyclePlaybackRate),
        )
        .unwrap();
        let seek = handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::RequestSeek(12.5)),
        )
        .unwrap();

        // Assert
        assert_eq!(rate, CommandOutcome::RateChanged(PlaybackRate::OneAndHalf));
        assert_eq!(seek, CommandOutcome::Applied);
        assert_eq!(video.calls().last(), Some(&TransportCall::Seek(12.5)));
    }

    #[test]
    fn test_handle_navigate_reports_outcome() {
        let mut session = session_with(Arc::new(RecordingTransport::new()));

        let outcome = handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::Navigate(Some("missing".to_owned()))),
        )
        .unwrap();

        assert_eq!(
            outcome,
            CommandOutcome::Navigated(ResolvedOutcome::NotFound("missing".to_owned()))
        );
    }

    #[test]
    fn test_handle_rejects_non_finite_seek() {
        let mut session = session_with(Arc::new(RecordingTransport::new()));

        let result = handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::RequestSeek(f64::INFINITY)),
        );

        assert!(matches!(result, Err(PlaybackError::Validation(_))));
    }

    #[test]
    fn test_handle_rejects_commands_after_termination() {
        // Arrange
        let mut session = session_with(Arc::new(RecordingTransport::new()));
        handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::Navigate(None)),
        )
        .unwrap();

        // Act
        let result = handle(
            &mut session,
            &CommandEnvelope::new(SessionCommand::TogglePlayPause),
        );

        // Assert
        assert_eq!(result, Err(PlaybackError::SessionClosed));
    }
}
