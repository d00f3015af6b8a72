//! Branch resolution.
//!
//! Maps a navigation decision onto the graph. The resolver keeps no history:
//! graphs may revisit nodes and no cycle detection is performed.

use super::node::{Node, NodeGraph};

/// What a navigation decision resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOutcome {
    /// Play this node next.
    Advance(Node),
    /// The sequence is over; the caller redirects externally.
    Terminate,
    /// The target id is not in the graph. The caller substitutes the
    /// placeholder node and reports the authoring defect.
    NotFound(String),
}

/// Resolves `target` against `graph`. `None` is the termination sentinel.
#[must_use]
pub fn resolve(graph: &NodeGraph, target: Option<&str>) -> ResolvedOutcome {
    match target {
        None => ResolvedOutcome::Terminate,
        Some(id) => graph.get(id).map_or_else(
            || ResolvedOutcome::NotFound(id.to_owned()),
            |node| ResolvedOutcome::Advance(node.clone()),
        ),
    }
}
