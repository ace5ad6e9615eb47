use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::errors::OracleError;
use crate::models::{AbstractEvent, AbstractParseTree, Event, Node, Variable};

const MAX_SNAPSHOT_BYTES: u64 = 512 * 1_048_576;

/// Serialized form of an event graph export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub abstract_events: Vec<AbstractEvent>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub parse_trees: Vec<Node>,
    #[serde(default)]
    pub abstract_parse_trees: Vec<AbstractParseTree>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl GraphSnapshot {
    pub async fn read(path: &Path) -> Result<Self, OracleError> {
        if !path.exists() {
            return Err(OracleError::Graph(format!("Graph snapshot not found: {}", path.display())));
        }

        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > MAX_SNAPSHOT_BYTES {
            return Err(OracleError::Graph(format!(
                "Graph snapshot {} exceeds {} MB",
                path.display(),
                MAX_SNAPSHOT_BYTES / 1_048_576
            )));
        }

        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| OracleError::Graph(format!("Invalid graph snapshot {}: {}", path.display(), e)))
    }
}
