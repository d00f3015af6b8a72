//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use videoask_core::error::PlaybackError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The node graph could not be loaded.
    #[error("graph error: {0}")]
    Graph(#[from] PlaybackError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `PlaybackError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub PlaybackError);

impl From<PlaybackError> for ApiError {
    fn from(err: PlaybackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            PlaybackError::EmptyNodeSet => (StatusCode::BAD_REQUEST, "empty_node_set"),
            PlaybackError::DanglingBranchReference(_) => {
                (StatusCode::NOT_FOUND, "dangling_branch_reference")
            }
            PlaybackError::MediaUnavailable { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "media_unavailable")
            }
            PlaybackError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            PlaybackError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
            PlaybackError::SessionClosed => (StatusCode::GONE, "session_closed"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: PlaybackError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_session_closed_maps_to_410() {
        assert_eq!(status_of(PlaybackError::SessionClosed), StatusCode::GONE);
    }

    #[test]
    fn test_dangling_reference_maps_to_404() {
        assert_eq!(
            status_of(PlaybackError::DanglingBranchReference("ghost".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(PlaybackError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_media_unavailable_maps_to_422() {
        assert_eq!(
            status_of(PlaybackError::MediaUnavailable {
                url: "a.mp4".into(),
                reason: "404".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(PlaybackError::Infrastructure("disk gone".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
