//! Routes for viewer intents against the playback session.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use videoask_graph::domain::resolver::ResolvedOutcome;
use videoask_playback::application::command_handlers::CommandOutcome;
use videoask_playback::domain::commands::{CommandEnvelope, SessionCommand};
use videoask_playback::domain::state::PlaybackSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /mute and POST /fullscreen. Omitting `value`
/// toggles.
#[derive(Debug, Default, Deserialize)]
pub struct FlagRequest {
    /// Explicit value to set.
    #[serde(default)]
    pub value: Option<bool>,
}

/// Request body for POST /seek.
#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    /// Absolute target in seconds.
    pub seconds: f64,
}

/// Request body for POST /navigate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    /// Node to play next; `null` ends the sequence. The key is required.
    #[serde(deserialize_with = "required_nullable")]
    pub target_node_id: Option<String>,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Request body for POST /overlay.
#[derive(Debug, Deserialize)]
pub struct OverlayRequest {
    /// Overlay source; empty removes the overlay.
    pub url: String,
}

/// What a command did, in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutcomeView {
    /// Applied; see the snapshot.
    Applied,
    /// A node switch is scheduled.
    #[serde(rename_all = "camelCase")]
    Advance {
        /// The node that will become active.
        node_id: String,
    },
    /// The sequence ended.
    Terminate,
    /// The target does not exist; the placeholder will be shown.
    #[serde(rename_all = "camelCase")]
    NotFound {
        /// The missing id.
        target_node_id: String,
    },
    /// The playback speed changed.
    #[serde(rename_all = "camelCase")]
    RateChanged {
        /// The new multiplier.
        playback_rate: f64,
    },
}

impl From<CommandOutcome> for OutcomeView {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Applied => Self::Applied,
            CommandOutcome::Navigated(ResolvedOutcome::Advance(node)) => {
                Self::Advance { node_id: node.id }
            }
            CommandOutcome::Navigated(ResolvedOutcome::Terminate) => Self::Terminate,
            CommandOutcome::Navigated(ResolvedOutcome::NotFound(target_node_id)) => {
                Self::NotFound { target_node_id }
            }
            CommandOutcome::RateChanged(rate) => Self::RateChanged {
                playback_rate: rate.multiplier(),
            },
        }
    }
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// Correlation id the command was logged under.
    pub correlation_id: Uuid,
    /// What the command did.
    pub outcome: OutcomeView,
    /// Session snapshot after the command.
    pub snapshot: PlaybackSnapshot,
}

/// Sends `command` to the session and wraps the result.
pub(crate) async fn dispatch(
    state: &AppState,
    command: SessionCommand,
) -> Result<Json<CommandResponse>, ApiError> {
    let envelope = CommandEnvelope::new(command);
    let correlation_id = envelope.correlation_id;

    info!(%correlation_id, command = envelope.command.name(), "handling command");

    let outcome = state.session.dispatch(envelope).await?;

    Ok(Json(CommandResponse {
        correlation_id,
        outcome: outcome.into(),
        snapshot: state.session.snapshot(),
    }))
}

/// GET /
#[instrument(skip(state))]
async fn get_snapshot(State(state): State<AppState>) -> Json<PlaybackSnapshot> {
    Json(state.session.snapshot())
}

/// POST /play-pause
#[instrument(skip(state))]
async fn play_pause(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::TogglePlayPause).await
}

/// POST /mute
#[instrument(skip(state))]
async fn mute(
    State(state): State<AppState>,
    Json(request): Json<FlagRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = request
        .value
        .map_or(SessionCommand::ToggleMuted, SessionCommand::SetMuted);
    dispatch(&state, command).await
}

/// POST /fullscreen
#[instrument(skip(state))]
async fn fullscreen(
    State(state): State<AppState>,
    Json(request): Json<FlagRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = request
        .value
        .map_or(SessionCommand::ToggleFullscreen, SessionCommand::SetFullscreen);
    dispatch(&state, command).await
}

/// POST /playback-rate
#[instrument(skip(state))]
async fn playback_rate(
    State(state): State<AppState>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::CyclePlaybackRate).await
}

/// POST /seek
#[instrument(skip(state))]
async fn seek(
    State(state): State<AppState>,
    Json(request): Json<SeekRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::RequestSeek(request.seconds)).await
}

/// POST /navigate
#[instrument(skip(state))]
async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::Navigate(request.target_node_id)).await
}

/// POST /blink
#[instrument(skip(state))]
async fn blink(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::TriggerBlink).await
}

/// POST /overlay
#[instrument(skip(state))]
async fn set_overlay(
    State(state): State<AppState>,
    Json(request): Json<OverlayRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::SetAudioOverlay(request.url)).await
}

/// POST /overlay/start
#[instrument(skip(state))]
async fn start_overlay(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::StartAudio).await
}

/// POST /overlay/stop
#[instrument(skip(state))]
async fn stop_overlay(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::StopAudio).await
}

/// Returns the router for viewer intents.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/play-pause", post(play_pause))
        .route("/mute", post(mute))
        .route("/fullscreen", post(fullscreen))
        .route("/playback-rate", post(playback_rate))
        .route("/seek", post(seek))
        .route("/navigate", post(navigate))
        .route("/blink", post(blink))
        .route("/overlay", post(set_overlay))
        .route("/overlay/start", post(start_overlay))
        .route("/overlay/stop", post(stop_overlay))
}
