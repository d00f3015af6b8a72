//! Routes the browser uses to mirror the transport and report media events.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, instrument};
use videoask_core::error::PlaybackError;
use videoask_playback::domain::commands::SessionCommand;

use super::session::{CommandResponse, dispatch};
use crate::error::ApiError;
use crate::state::AppState;
use crate::transport::TransportView;

/// Request body for POST /time and POST /duration.
#[derive(Debug, Deserialize)]
pub struct SecondsRequest {
    /// A position or length in seconds.
    pub seconds: f64,
}

/// Request body for POST /metadata.
#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
}

/// Request body for POST /error.
#[derive(Debug, Deserialize)]
pub struct MediaErrorRequest {
    /// Why the source could not be played.
    pub reason: String,
}

/// GET /
async fn get_transport(State(state): State<AppState>) -> Json<TransportView> {
    Json(state.transport.view())
}

/// POST /time
async fn report_time(
    State(state): State<AppState>,
    Json(request): Json<SecondsRequest>,
) -> Result<Json<TransportView>, ApiError> {
    if request.seconds < 0.0 {
        return Err(PlaybackError::Validation(format!(
            "playhead cannot be negative, got {}",
            request.seconds
        ))
        .into());
    }
    debug!(seconds = request.seconds, "playhead reported");
    state.transport.report_time(request.seconds);
    Ok(Json(state.transport.view()))
}

/// POST /duration
#[instrument(skip(state))]
async fn report_duration(
    State(state): State<AppState>,
    Json(request): Json<SecondsRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    state.transport.report_duration(request.seconds);
    dispatch(&state, SessionCommand::ReportMediaDuration(request.seconds)).await
}

/// POST /metadata
#[instrument(skip(state))]
async fn report_metadata(
    State(state): State<AppState>,
    Json(request): Json<MetadataRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(
        &state,
        SessionCommand::ReportIntrinsicSize {
            width: request.width,
            height: request.height,
        },
    )
    .await
}

/// POST /video-play
#[instrument(skip(state))]
async fn video_play(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::VideoPlayed).await
}

/// POST /overlay-play
#[instrument(skip(state))]
async fn overlay_play(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::OverlayPlayed).await
}

/// POST /overlay-ended
#[instrument(skip(state))]
async fn overlay_ended(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::OverlayEnded).await
}

/// POST /error
#[instrument(skip(state))]
async fn media_error(
    State(state): State<AppState>,
    Json(request): Json<MediaErrorRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    dispatch(&state, SessionCommand::ReportMediaError(request.reason)).await
}

/// Returns the router for transport mirroring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_transport))
        .route("/time", post(report_time))
        .route("/duration", post(report_duration))
        .route("/metadata", post(report_metadata))
        .route("/video-play", post(video_play))
        .route("/overlay-play", post(overlay_play))
        .route("/overlay-ended", post(overlay_ended))
        .route("/error", post(media_error))
}
