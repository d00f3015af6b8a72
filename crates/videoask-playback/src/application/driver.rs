//! Runs a `PlaybackSession` on a tokio task.
//!
//! The session is owned by exactly one task. Hosts talk to it through a
//! cloneable `SessionHandle`: commands go in over an mpsc channel and are
//! answered over a oneshot, snapshots come out over a watch channel. A
//! fixed-cadence interval pumps the session's deferred tasks.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, instrument};
use videoask_core::error::PlaybackError;
use videoask_core::event::DomainEvent;

use crate::application::command_handlers::{self, CommandOutcome};
use crate::domain::commands::{CommandEnvelope, SessionCommand};
use crate::domain::session::PlaybackSession;
use crate::domain::state::PlaybackSnapshot;

const COMMAND_BUFFER: usize = 64;

struct Request {
    envelope: CommandEnvelope,
    reply: oneshot::Sender<Result<CommandOutcome, PlaybackError>>,
}

/// Cloneable access to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
}

impl SessionHandle {
    /// Sends `command` under a fresh correlation id and waits for the result.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::SessionClosed` if the session has stopped, and
    /// whatever the command handler returns otherwise.
    pub async fn execute(&self, command: SessionCommand) -> Result<CommandOutcome, PlaybackError> {
        self.dispatch(CommandEnvelope::new(command)).await
    }

    /// Sends a prepared envelope and waits for the result.
    ///
    /// # Errors
    ///
    /// Same as [`SessionHandle::execute`].
    pub async fn dispatch(
        &self,
        envelope: CommandEnvelope,
    ) -> Result<CommandOutcome, PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { envelope, reply })
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        response.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// The latest published snapshot. Still readable after the session stops.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.clone()
    }

    /// Whether the driver task is still accepting commands.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.commands.is_closed()
    }
}

/// Moves `session` onto its own task. The task ends when the session
/// terminates, is torn down, or every handle is dropped.
#[must_use]
pub fn spawn_session(session: PlaybackSession) -> (SessionHandle, JoinHandle<()>) {
    let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
    let snapshots = session.subscribe();
    let task = tokio::spawn(run(session, inbox));
    (
        SessionHandle {
            commands,
            snapshots,
        },
        task,
    )
}

#[instrument(skip_all, fields(session_id = %session.id()))]
async fn run(mut session: PlaybackSession, mut inbox: mpsc::Receiver<Request>) {
    let session_id = session.id();
    let cadence = session.config().poll_interval.max(Duration::from_millis(1));
    let mut ticker = time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(%session_id, cadence_ms = cadence.as_millis(), "session driver started");

    loop {
        tokio::select! {
            request = inbox.recv() => {
                let Some(Request { envelope, reply }) = request else {
                    debug!(%session_id, "all handles dropped");
                    session.teardown();
                    publish_events(&mut session);
                    break;
                };
                let result = command_handlers::handle(&mut session, &envelope);
                if let Err(error) = &result {
                    debug!(
                        %session_id,
                        correlation_id = %envelope.correlation_id,
                        %error,
                        "command rejected"
                    );
                }
                // The caller may have stopped waiting.
                let _ = reply.send(result);
            }
            _ = ticker.tick() => session.pump(),
        }

        publish_events(&mut session);
        if !session.is_active() {
            break;
        }
    }

    info!(%session_id, phase = ?session.phase(), "session driver stopped");
}

fn publish_events(session: &mut PlaybackSession) {
    for event in session.drain_events() {
        debug!(
            session_id = %event.metadata().session_id,
            event_type = event.event_type(),
            sequence_number = event.metadata().sequence_number,
            payload = %event.to_payload(),
            "playback event"
        );
    }
}
