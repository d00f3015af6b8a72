//! Node file loading.
//!
//! Node files are a top-level sequence of nodes in JSON or YAML. Everything
//! is validated here so playback never sees a malformed node.

use std::path::Path;

use tracing::{info, warn};
use videoask_core::error::PlaybackError;

use crate::domain::node::{Node, NodeGraph};

/// Supported node file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl GraphFormat {
    /// Picks a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Validation` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, PlaybackError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(PlaybackError::Validation(format!(
                "unsupported node file extension: {}",
                path.display()
            ))),
        }
    }
}

/// Parses and validates a node file already in memory.
///
/// # Errors
///
/// Returns `PlaybackError::Infrastructure` if the text does not parse,
/// `PlaybackError::EmptyNodeSet` or `PlaybackError::Validation` if the nodes
/// fail validation.
pub fn parse_graph(source: &str, format: GraphFormat) -> Result<NodeGraph, PlaybackError> {
    let nodes: Vec<Node> = match format {
        GraphFormat::Json => serde_json::from_str(source)
            .map_err(|e| PlaybackError::Infrastructure(format!("invalid node JSON: {e}")))?,
        GraphFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| PlaybackError::Infrastructure(format!("invalid node YAML: {e}")))?,
    };

    let graph = NodeGraph::new(nodes)?;
    for (node_id, target) in graph.dangling_references() {
        warn!(node_id = %node_id, target = %target, "question targets a node that does not exist");
    }
    Ok(graph)
}

/// Reads, parses and validates a node file.
///
/// # Errors
///
/// Returns `PlaybackError::Infrastructure` if the file cannot be read, and
/// everything [`parse_graph`] returns.
pub async fn load_graph(path: &Path) -> Result<NodeGraph, PlaybackError> {
    let format = GraphFormat::from_path(path)?;
    let source = tokio::fs::read_to_string(path).await.map_err(|e| {
        PlaybackError::Infrastructure(format!("cannot read {}: {e}", path.display()))
    })?;

    let graph = parse_graph(&source, format)?;
    info!(path = %path.display(), nodes = graph.len(), "loaded node graph");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const JSON: &str = r#"[
        {
            "id": "a",
            "title": "Hello",
            "url": "https://cdn.example.com/a.mp4",
            "questions": [{ "label": "Next", "targetNodeId": "b" }]
        },
        {
            "id": "b",
            "title": "Bye",
            "url": "https://cdn.example.com/b.mp4",
            "questions": [{ "label": "End", "targetNodeId": null }]
        }
    ]"#;

    const YAML: &str = "
- id: a
  title: Hello
  url: https://cdn.example.com/a.mp4
  questions:
    - label: Next
      targetNodeId: b
- id: b
  title: Bye
  url: https://cdn.example.com/b.mp4
  questions:
    - label: End
      targetNodeId: null
";

    #[test]
    fn test_parse_graph_reads_json_and_yaml_alike() {
        let from_json = parse_graph(JSON, GraphFormat::Json).unwrap();
        let from_yaml = parse_graph(YAML, GraphFormat::Yaml).unwrap();

        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json.first().id, "a");
        assert_eq!(
            from_json.get("b").unwrap().questions[0].target_node_id,
            None
        );
    }

    #[test]
    fn test_parse_graph_rejects_empty_list() {
        assert_eq!(
            parse_graph("[]", GraphFormat::Json).unwrap_err(),
            PlaybackError::EmptyNodeSet
        );
    }

    #[test]
    fn test_parse_graph_rejects_missing_fields() {
        let result = parse_graph(r#"[{ "id": "a", "title": "t" }]"#, GraphFormat::Json);

        assert!(matches!(result, Err(PlaybackError::Infrastructure(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            GraphFormat::from_path(Path::new("nodes.yml")).unwrap(),
            GraphFormat::Yaml
        );
        assert_eq!(
            GraphFormat::from_path(Path::new("nodes.json")).unwrap(),
            GraphFormat::Json
        );
        assert!(GraphFormat::from_path(Path::new("nodes.txt")).is_err());
    }

    #[tokio::test]
    async fn test_load_graph_reads_file() {
        // Arrange
        let path: PathBuf =
            std::env::temp_dir().join(format!("videoask-loader-{}.json", std::process::id()));
        tokio::fs::write(&path, JSON).await.unwrap();

        // Act
        let result = load_graph(&path).await;
        tokio::fs::remove_file(&path).await.unwrap();

        // Assert
        assert_eq!(result.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_graph_reports_missing_file() {
        let result = load_graph(Path::new("/nonexistent/videoask/nodes.json")).await;

        assert!(matches!(result, Err(PlaybackError::Infrastructure(_))));
    }
}
