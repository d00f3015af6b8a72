//! Session events for the playback context.

use serde::{Deserialize, Serialize};
use videoask_core::event::{DomainEvent, EventMetadata};

/// Emitted when a session starts on its first node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInitialized {
    /// Number of nodes in the loaded graph.
    pub node_count: usize,
}

/// Emitted whenever a node becomes the active node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeActivated {
    /// The new active node; empty for the placeholder.
    pub node_id: String,
}

/// Emitted when navigation pointed at a node that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingBranchReference {
    /// The node that was active when the reference was followed.
    pub from_node_id: String,
    /// The missing target id.
    pub target_node_id: String,
}

/// Emitted when the transport reports that a source cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUnavailable {
    /// The failing source.
    pub url: String,
    /// Transport-supplied reason.
    pub reason: String,
}

/// Emitted when the branching sequence ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTerminated {
    /// The node the viewer was on.
    pub from_node_id: String,
    /// External path the viewer is sent to.
    pub redirect_to: String,
}

/// Event payload variants for the playback context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// The session started.
    SessionInitialized(SessionInitialized),
    /// A node became active.
    NodeActivated(NodeActivated),
    /// A dangling reference was followed.
    DanglingBranchReference(DanglingBranchReference),
    /// The transport failed to play a source.
    MediaUnavailable(MediaUnavailable),
    /// The sequence terminated.
    BranchTerminated(BranchTerminated),
    /// The owner tore the session down.
    SessionTornDown,
}

/// Event envelope for the playback context.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

pub(crate) fn event_type_of(kind: &PlaybackEventKind) -> &'static str {
    match kind {
        PlaybackEventKind::SessionInitialized(_) => "playback.session_initialized",
        PlaybackEventKind::NodeActivated(_) => "playback.node_activated",
        PlaybackEventKind::DanglingBranchReference(_) => "playback.dangling_branch_reference",
        PlaybackEventKind::MediaUnavailable(_) => "playback.media_unavailable",
        PlaybackEventKind::BranchTerminated(_) => "playback.branch_terminated",
        PlaybackEventKind::SessionTornDown => "playback.session_torn_down",
    }
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        event_type_of(&self.kind)
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
