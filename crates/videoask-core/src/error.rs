//! Playback error types.

use thiserror::Error;

/// Top-level error type shared by every VideoAsk crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// A session was initialized with no nodes. Fatal: the session cannot
    /// be used.
    #[error("cannot initialize a playback session with an empty node set")]
    EmptyNodeSet,

    /// A question points at a node id that is not part of the loaded graph.
    #[error("branch target not found: {0}")]
    DanglingBranchReference(String),

    /// The media transport could not play a source. Reported by the
    /// transport and passed through unmodified.
    #[error("media unavailable for {url}: {reason}")]
    MediaUnavailable {
        /// The media source that failed.
        url: String,
        /// Transport-supplied reason.
        reason: String,
    },

    /// Authored content failed boundary validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// An I/O or parse error while loading content.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// A command was sent to a session that has already been torn down.
    #[error("playback session is closed")]
    SessionClosed,
}
