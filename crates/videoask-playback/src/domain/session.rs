//! The playback session aggregate.
//!
//! `PlaybackSession` is the only writer of `PlaybackState`. The progress
//! tracker, overlay coordinator and branch resolver only propose; the session
//! applies their proposals, drives the transports, and publishes a snapshot
//! after every change.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use videoask_core::clock::{Clock, deadline};
use videoask_core::error::PlaybackError;
use videoask_core::event::EventMetadata;
use videoask_core::transport::{MediaTransport, Navigator, OverlayTransport};
use videoask_graph::domain::node::{Node, NodeGraph};
use videoask_graph::domain::resolver::{self, ResolvedOutcome};

use super::events::{
    BranchTerminated, DanglingBranchReference, MediaUnavailable, NodeActivated, PlaybackEvent,
    PlaybackEventKind, SessionInitialized, event_type_of,
};
use super::overlay::{OverlayAudioCoordinator, OverlayDirective};
use super::progress::{ProgressTracker, TickInput, TickOutcome};
use super::scheduler::{DeferredTask, Scheduler, TaskId};
use super::state::{PlaybackRate, PlaybackSnapshot, PlaybackState, SessionPhase};
use crate::config::PlaybackConfig;

/// The collaborators a session drives.
#[derive(Clone)]
pub struct SessionPorts {
    /// Time source for every deferred task.
    pub clock: Arc<dyn Clock>,
    /// The main video element.
    pub video: Arc<dyn MediaTransport>,
    /// The audio overlay element.
    pub overlay: Arc<dyn OverlayTransport>,
    /// Route navigation for termination.
    pub navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for SessionPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPorts").finish_non_exhaustive()
    }
}

/// The aggregate root for one viewing of a branching sequence.
#[derive(Debug)]
pub struct PlaybackSession {
    id: Uuid,
    graph: NodeGraph,
    config: PlaybackConfig,
    ports: SessionPorts,
    state: PlaybackState,
    phase: SessionPhase,
    tracker: ProgressTracker,
    overlay: OverlayAudioCoordinator,
    scheduler: Scheduler,
    /// Bumped on every node switch; tasks from older epochs are cancelled.
    epoch: u64,
    last_sample: Option<f64>,
    seek_held_polls: u32,
    portrait_reported: bool,
    pending_settle: Option<TaskId>,
    pending_animation_clear: Option<TaskId>,
    pending_blink_clear: Option<TaskId>,
    snapshots: watch::Sender<PlaybackSnapshot>,
    /// Events already handed out through `drain_events`.
    drained: i64,
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Starts a session on the first of `nodes`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::EmptyNodeSet` if `nodes` is empty, and
    /// `PlaybackError::Validation` if the nodes fail graph validation.
    pub fn initialize(
        nodes: Vec<Node>,
        config: PlaybackConfig,
        ports: SessionPorts,
    ) -> Result<Self, PlaybackError> {
        let graph = NodeGraph::new(nodes)?;
        Ok(Self::start(graph, config, ports))
    }

    /// Starts a session on an already validated graph.
    #[must_use]
    pub fn start(graph: NodeGraph, config: PlaybackConfig, ports: SessionPorts) -> Self {
        let id = Uuid::new_v4();
        let first = graph.first().clone();
        let state = PlaybackState::new(first.clone());
        let (snapshots, _) = watch::channel(PlaybackSnapshot {
            session_id: id,
            sequence: 0,
            phase: SessionPhase::Active,
            state: state.clone(),
        });

        let mut session = Self {
            id,
            tracker: ProgressTracker::new(
                config.stall_epsilon,
                config.seek_tolerance,
                config.seek_hold_polls,
            ),
            graph,
            config,
            ports,
            state,
            phase: SessionPhase::Active,
            overlay: OverlayAudioCoordinator::new(),
            scheduler: Scheduler::new(),
            epoch: 0,
            last_sample: None,
            seek_held_polls: 0,
            portrait_reported: false,
            pending_settle: None,
            pending_animation_clear: None,
            pending_blink_clear: None,
            snapshots,
            drained: 0,
            uncommitted_events: Vec::new(),
        };

        info!(session_id = %id, nodes = session.graph.len(), "playback session initialized");
        session.record(PlaybackEventKind::SessionInitialized(SessionInitialized {
            node_count: session.graph.len(),
        }));
        let now = session.now();
        session.enter_node(first, now);
        session.publish();
        session
    }


    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current authoritative state.
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Whether the session still accepts commands.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Timings in effect.
    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribes to snapshots. The receiver sees the current snapshot
    /// immediately and is notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.subscribe()
    }

    /// Events not yet drained.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[PlaybackEvent] {
        &self.uncommitted_events
    }

    /// Hands out and forgets the pending events.
    #[allow(clippy::cast_possible_wrap)]
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.drained += self.uncommitted_events.len() as i64;
        std::mem::take(&mut self.uncommitted_events)
    }


    /// Flips between playing and paused and tells the transport.
    pub fn toggle_play_pause(&mut self) {
        if !self.accepting("toggle_play_pause") {
            return;
        }
        self.state.paused = !self.state.paused;
        if self.state.paused {
            self.ports.video.pause();
        } else {
            self.ports.video.play();
        }
        self.publish();
    }

    /// Sets the mute flag.
    pub fn set_muted(&mut self, muted: bool) {
        if !self.accepting("set_muted") {
            return;
        }
        self.state.muted = muted;
        self.publish();
    }

    /// Sets the fullscreen flag.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if !self.accepting("set_fullscreen") {
            return;
        }
        self.state.fullscreen = fullscreen;
        self.publish();
    }

    /// Flips the mute flag.
    pub fn toggle_muted(&mut self) {
        self.set_muted(!self.state.muted);
    }

    /// Flips the fullscreen flag.
    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.state.fullscreen);
    }

    /// Moves to the next playback speed (1x, 1.5x, 2x, back to 1x) and
    /// applies it to the transport.
    pub fn cycle_playback_rate(&mut self) -> PlaybackRate {
        if !self.accepting("cycle_playback_rate") {
            return self.state.playback_rate;
        }
        let rate = self.state.playback_rate.next();
        self.state.playback_rate = rate;
        self.ports.video.set_playback_rate(rate.multiplier());
        self.publish();
        rate
    }

    /// Records the media duration. Non-finite or negative values count as
    /// unknown.
    pub fn report_media_duration(&mut self, seconds: f64) {
        if !self.accepting("report_media_duration") {
            return;
        }
        let duration = if seconds.is_finite() && seconds > 0.0 {
            seconds
        } else {
            debug!(session_id = %self.id, seconds, "ignoring unusable duration");
            0.0
        };
        self.apply_duration(duration);
        self.publish();
    }

    /// Records the clip orientation. Only the first report per node counts.
    pub fn report_portrait(&mut self, portrait: bool) {
        if !self.accepting("report_portrait") {
            return;
        }
        if self.portrait_reported {
            debug!(session_id = %self.id, "orientation already reported for this node");
            return;
        }
        self.portrait_reported = true;
        self.state.is_portrait = portrait;
        self.publish();
    }

    /// Derives orientation from intrinsic dimensions.
    pub fn report_intrinsic_size(&mut self, width: u32, height: u32) {
        self.report_portrait(height > width);
    }

    /// Jumps to `seconds`. Progress is updated immediately when the duration
    /// is known; poll samples are ignored until the transport gets there.
    pub fn request_seek(&mut self, seconds: f64) {
        if !self.accepting("request_seek") {
            return;
        }
        let Some(plan) = self.tracker.seek(seconds, self.state.duration) else {
            warn!(session_id = %self.id, seconds, "ignoring non-finite seek");
            return;
        };
        self.ports.video.set_current_time(plan.time);
        self.state.seek_target = Some(plan.time);
        self.seek_held_polls = 0;
        self.last_sample = None;
        if let Some(progress) = plan.progress {
            self.state.progress = progress;
        }
        self.publish();
    }

    /// Follows a question. `None` ends the sequence at once; anything else
    /// switches node after the settle delay. A later call supersedes a
    /// pending one.
    pub fn navigate(&mut self, target: Option<&str>) -> ResolvedOutcome {
        let outcome = resolver::resolve(&self.graph, target);
        if !self.accepting("navigate") {
            return outcome;
        }

        match &outcome {
            ResolvedOutcome::Terminate => self.terminate(),
            ResolvedOutcome::Advance(_) | ResolvedOutcome::NotFound(_) => {
                if let Some(previous) = self.pending_settle.take() {
                    self.scheduler.cancel(previous);
                }
                let due = deadline(self.now(), self.config.settle_delay);
                let task = self.scheduler.schedule(
                    due,
                    self.epoch,
                    DeferredTask::SettleNavigation(outcome.clone()),
                );
                self.pending_settle = Some(task);
                debug!(session_id = %self.id, target = ?target, "navigation scheduled");
            }
        }

        self.publish();
        outcome
    }

    /// Sets `blinking` for the blink decay window.
    pub fn trigger_blink(&mut self) {
        if !self.accepting("trigger_blink") {
            return;
        }
        self.state.blinking = true;
        let delay = self.config.blink_decay;
        self.pending_blink_clear = Some(self.reschedule(
            self.pending_blink_clear,
            delay,
            DeferredTask::ClearBlink,
        ));
        self.publish();
    }


    /// Replaces the overlay source; empty removes it.
    pub fn set_audio_overlay(&mut self, url: &str) {
        if !self.accepting("set_audio_overlay") {
            return;
        }
        let directives = self.overlay.set_source(url);
        self.apply_overlay(directives);
        self.publish();
    }

    /// The overlay element fired `play`.
    pub fn on_overlay_play(&mut self) {
        if !self.accepting("on_overlay_play") {
            return;
        }
        let directives = self.overlay.on_play();
        self.apply_overlay(directives);
        self.publish();
    }

    /// The overlay element fired `ended`.
    pub fn on_overlay_ended(&mut self) {
        if !self.accepting("on_overlay_ended") {
            return;
        }
        let directives = self.overlay.on_ended();
        self.apply_overlay(directives);
        self.publish();
    }

    /// Makes sure the overlay is playing.
    pub fn start_audio(&mut self) {
        if !self.accepting("start_audio") {
            return;
        }
        let directives = self.overlay.ensure_playing();
        self.apply_overlay(directives);
        self.publish();
    }

    /// Tap-to-replay; same as [`Self::start_audio`].
    pub fn toggle_audio_play(&mut self) {
        self.start_audio();
    }

    /// Pauses the overlay in place.
    pub fn stop_audio(&mut self) {
        if !self.accepting("stop_audio") {
            return;
        }
        let directives = self.overlay.stop();
        self.apply_overlay(directives);
        self.publish();
    }


    /// The main video fired `play`; the overlay yields.
    pub fn on_video_play(&mut self) {
        if !self.accepting("on_video_play") {
            return;
        }
        if self.state.paused {
            self.state.paused = false;
            self.ports.video.play();
        }
        let directives = self.overlay.on_video_play();
        self.apply_overlay(directives);
        self.publish();
    }

    /// The transport cannot play the active source. Surfaced as-is.
    pub fn report_media_error(&mut self, reason: &str) {
        if !self.accepting("report_media_error") {
            return;
        }
        let url = self.state.active_node.url.clone();
        warn!(session_id = %self.id, url = %url, reason, "media unavailable");
        self.state.media_error = Some(reason.to_owned());
        self.record(PlaybackEventKind::MediaUnavailable(MediaUnavailable {
            url,
            reason: reason.to_owned(),
        }));
        self.publish();
    }


    /// Runs every deferred task that is due, one at a time, then publishes.
    pub fn pump(&mut self) {
        if !self.is_active() {
            return;
        }
        let now = self.now();
        while let Some(task) = self.scheduler.pop_due(now) {
            self.run_task(task, now);
            if !self.is_active() {
                break;
            }
        }
        self.publish();
    }

    /// Cancels every deferred task and closes the session.
    pub fn teardown(&mut self) {
        if !self.is_active() {
            return;
        }
        self.cancel_all_tasks();
        info!(session_id = %self.id, "playback session torn down");
        self.record(PlaybackEventKind::SessionTornDown);
        self.phase = SessionPhase::TornDown;
        self.publish();
    }


    fn now(&self) -> DateTime<Utc> {
        self.ports.clock.now()
    }

    fn accepting(&self, operation: &'static str) -> bool {
        if self.is_active() {
            return true;
        }
        debug!(session_id = %self.id, operation, "session closed, ignoring");
        false
    }

    fn run_task(&mut self, task: DeferredTask, now: DateTime<Utc>) {
        match task {
            DeferredTask::PollProgress => {
                self.poll_progress();
                let cadence = self.config.poll_interval.max(Duration::from_millis(1));
                self.scheduler
                    .schedule(deadline(now, cadence), self.epoch, DeferredTask::PollProgress);
            }
            DeferredTask::SettleNavigation(outcome) => {
                self.pending_settle = None;
                self.settle(outcome, now);
            }
            DeferredTask::ClearAnimation => {
                self.pending_animation_clear = None;
                self.state.animating = false;
            }
            DeferredTask::ClearBlink => {
                self.pending_blink_clear = None;
                self.state.blinking = false;
            }
        }
    }

    fn poll_progress(&mut self) {
        if let Some(duration) = self.ports.video.duration() {
            #[allow(clippy::float_cmp)]
            let changed = duration != self.state.duration;
            if duration.is_finite() && duration > 0.0 && changed {
                self.apply_duration(duration);
            }
        }

        let input = TickInput {
            paused: self.state.paused,
            duration: self.state.duration,
            current_time: self.ports.video.current_time(),
            progress: self.state.progress,
            pending_seek: self.state.seek_target,
            held_polls: self.seek_held_polls,
            last_sample: self.last_sample,
        };
        match self.tracker.tick(&input) {
            TickOutcome::Skip => {}
            TickOutcome::HoldForSeek => {
                self.seek_held_polls += 1;
                debug!(session_id = %self.id, "holding progress until seek lands");
            }
            TickOutcome::SeekAbandoned { progress } => {
                warn!(
                    session_id = %self.id,
                    seek_target = ?self.state.seek_target,
                    polls = self.seek_held_polls,
                    "transport never reached seek target, following it"
                );
                self.state.seek_target = None;
                self.seek_held_polls = 0;
                self.state.progress = progress;
                self.last_sample = Some(progress);
            }
            TickOutcome::Update {
                progress,
                sample,
                seek_settled,
                ..
            } => {
                if seek_settled {
                    self.state.seek_target = None;
                    self.seek_held_polls = 0;
                }
                self.state.progress = progress;
                self.last_sample = Some(sample);
            }
        }
    }

    fn apply_duration(&mut self, duration: f64) {
        self.state.duration = duration;
        self.last_sample = None;
        if duration > 0.0 {
            if let Some(target) = self.state.seek_target {
                self.state.progress = (target / duration).clamp(0.0, 1.0);
            }
        }
    }

    fn settle(&mut self, outcome: ResolvedOutcome, now: DateTime<Utc>) {
        let node = match outcome {
            ResolvedOutcome::Advance(node) => node,
            ResolvedOutcome::NotFound(target) => {
                let from = self.state.active_node.id.clone();
                error!(
                    session_id = %self.id,
                    from_node_id = %from,
                    target_node_id = %target,
                    "video with the specified id was not found"
                );
                self.record(PlaybackEventKind::DanglingBranchReference(
                    DanglingBranchReference {
                        from_node_id: from,
                        target_node_id: target,
                    },
                ));
                Node::placeholder()
            }
            ResolvedOutcome::Terminate => {
                self.terminate();
                return;
            }
        };

        self.enter_node(node, now);
        self.state.animating = true;
        let task = self.scheduler.schedule(
            deadline(now, self.config.animation_window),
            self.epoch,
            DeferredTask::ClearAnimation,
        );
        self.pending_animation_clear = Some(task);
    }

    fn enter_node(&mut self, node: Node, now: DateTime<Utc>) {
        self.epoch += 1;
        let dropped = self.scheduler.cancel_before_epoch(self.epoch);
        self.pending_settle = None;
        self.pending_animation_clear = None;
        self.pending_blink_clear = None;

        // The overlay belongs to the previous node; the new activation decides
        // the video's play state itself.
        if !self.overlay.clear().is_empty() {
            self.ports.overlay.unload();
        }

        self.portrait_reported = false;
        self.last_sample = None;
        self.seek_held_polls = 0;
        self.state.activate(node);

        if self.state.active_node.is_placeholder() {
            self.ports.video.load("");
        } else {
            self.ports.video.load(&self.state.active_node.url);
            self.ports
                .video
                .set_playback_rate(self.state.playback_rate.multiplier());
            self.ports.video.play();
        }

        info!(
            session_id = %self.id,
            node_id = %self.state.active_node.id,
            dropped_tasks = dropped,
            "node activated"
        );
        self.record(PlaybackEventKind::NodeActivated(NodeActivated {
            node_id: self.state.active_node.id.clone(),
        }));

        let cadence = self.config.poll_interval.max(Duration::from_millis(1));
        self.scheduler
            .schedule(deadline(now, cadence), self.epoch, DeferredTask::PollProgress);
    }

    fn terminate(&mut self) {
        let redirect_to = self.config.redirect_target.clone();
        self.cancel_all_tasks();
        info!(
            session_id = %self.id,
            from_node_id = %self.state.active_node.id,
            redirect_to = %redirect_to,
            "branching sequence terminated"
        );
        self.record(PlaybackEventKind::BranchTerminated(BranchTerminated {
            from_node_id: self.state.active_node.id.clone(),
            redirect_to: redirect_to.clone(),
        }));
        self.ports.navigator.redirect(&redirect_to);
        self.phase = SessionPhase::Terminated { redirect_to };
    }

    fn cancel_all_tasks(&mut self) {
        self.scheduler.cancel_all();
        self.pending_settle = None;
        self.pending_animation_clear = None;
        self.pending_blink_clear = None;
    }

    fn reschedule(&mut self, previous: Option<TaskId>, delay: Duration, task: DeferredTask) -> TaskId {
        if let Some(previous) = previous {
            self.scheduler.cancel(previous);
        }
        let due = deadline(self.now(), delay);
        self.scheduler.schedule(due, self.epoch, task)
    }

    fn apply_overlay(&mut self, directives: Vec<OverlayDirective>) {
        for directive in directives {
            match directive {
                OverlayDirective::PlaySource(url) => self.ports.overlay.play_source(&url),
                OverlayDirective::Resume => self.ports.overlay.resume(),
                OverlayDirective::Pause => self.ports.overlay.pause(),
                OverlayDirective::Unload => self.ports.overlay.unload(),
                OverlayDirective::PauseVideo => {
                    self.state.paused = true;
                    self.ports.video.pause();
                }
                OverlayDirective::ResumeVideo => {
                    if !self.state.active_node.is_placeholder() {
                        self.state.paused = false;
                        self.ports.video.play();
                    }
                }
            }
        }
        self.state.audio_overlay_url = self.overlay.url().to_owned();
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.drained + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: PlaybackEventKind) {
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: event_type_of(&kind).to_owned(),
                session_id: self.id,
                sequence_number: self.next_sequence_number(),
                occurred_at: self.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn publish(&self) {
        let state = &self.state;
        let phase = &self.phase;
        self.snapshots.send_if_modified(|snapshot| {
            if snapshot.state == *state && snapshot.phase == *phase {
                return false;
            }
            snapshot.sequence += 1;
            snapshot.state = state.clone();
            snapshot.phase = phase.clone();
            true
        });
    }
}
