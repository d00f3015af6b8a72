//! Nodes, questions and the validated node graph.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use videoask_core::error::PlaybackError;

/// A selectable answer shown after a node's clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Text shown to the viewer.
    pub label: String,
    /// The node to play next. `None` ends the branching sequence.
    #[serde(deserialize_with = "required_nullable")]
    pub target_node_id: Option<String>,
}

impl Question {
    /// A question that continues to `target`.
    #[must_use]
    pub fn to_node(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_node_id: Some(target.into()),
        }
    }

    /// A question that ends the sequence.
    #[must_use]
    pub fn terminal(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target_node_id: None,
        }
    }
}

// The key must be present; only its value may be null. A missing key would
// otherwise silently read as "terminate".
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// A single clip in the branching sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, non-empty identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Media source.
    pub url: String,
    /// Answers offered once the clip has played, in display order.
    pub questions: Vec<Question>,
}

impl Node {
    /// Creates a node.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            questions,
        }
    }

    /// The empty node shown after a dangling branch reference.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            url: String::new(),
            questions: Vec::new(),
        }
    }

    /// Whether this is the empty placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// A validated, ordered, immutable collection of nodes. The first node is
/// where a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
}

impl NodeGraph {
    /// Validates `nodes` and builds a graph.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::EmptyNodeSet` if `nodes` is empty.
    /// Returns `PlaybackError::Validation` if an id is empty or repeated, a
    /// url is empty, or a question targets the empty id.
    pub fn new(nodes: Vec<Node>) -> Result<Self, PlaybackError> {
        if nodes.is_empty() {
            return Err(PlaybackError::EmptyNodeSet);
        }

        let mut seen = HashSet::new();
        for (index, node) in nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(PlaybackError::Validation(format!(
                    "node at position {index} has an empty id"
                )));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(PlaybackError::Validation(format!(
                    "duplicate node id: {}",
                    node.id
                )));
            }
            if node.url.is_empty() {
                return Err(PlaybackError::Validation(format!(
                    "node {} has an empty url",
                    node.id
                )));
            }
            if node
                .questions
                .iter()
                .any(|q| q.target_node_id.as_deref() == Some(""))
            {
                return Err(PlaybackError::Validation(format!(
                    "node {} has a question with an empty target; use null to terminate",
                    node.id
                )));
            }
        }

        Ok(Self { nodes })
    }

    /// The node a session starts on.
    #[must_use]
    pub fn first(&self) -> &Node {
        // Non-empty by construction.
        &self.nodes[0]
    }

    /// Looks a node up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// All nodes in authored order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(node id, missing target)` for every question whose target is not in
    /// the graph. These play back as the placeholder node.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.questions.iter().filter_map(move |q| match &q.target_node_id {
                    Some(target) if self.get(target).is_none() => {
                        Some((node.id.clone(), target.clone()))
                    }
                    _ => None,
                })
            })
            .collect()
    }
}
