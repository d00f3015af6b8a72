//! Shared application state.

use std::sync::Arc;

use tokio::task::JoinHandle;
use videoask_graph::domain::node::NodeGraph;
use videoask_playback::application::clock::TokioClock;
use videoask_playback::application::driver::{SessionHandle, spawn_session};
use videoask_playback::config::PlaybackConfig;
use videoask_playback::domain::session::{PlaybackSession, SessionPorts};

use crate::transport::RemoteTransport;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The running playback session.
    pub session: SessionHandle,
    /// Desired transport state for the browser to mirror.
    pub transport: Arc<RemoteTransport>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(session: SessionHandle, transport: Arc<RemoteTransport>) -> Self {
        Self { session, transport }
    }

    /// Starts a session on `graph` driven by a fresh `RemoteTransport`.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn launch(graph: NodeGraph, config: PlaybackConfig) -> (Self, JoinHandle<()>) {
        let transport = Arc::new(RemoteTransport::new());
        let ports = SessionPorts {
            clock: Arc::new(TokioClock::new()),
            video: transport.clone(),
            overlay: transport.clone(),
            navigator: transport.clone(),
        };
        let (session, driver) = spawn_session(PlaybackSession::start(graph, config, ports));
        (Self::new(session, transport), driver)
    }
}
