//! HTTP host for the branching video player.
//!
//! One playback session per process. Viewer intents arrive on
//! `/api/v1/session`, the browser mirrors `/api/v1/transport` and reports
//! media events back to it.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod transport;
