use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A node of the wrong kind sits where the grammar only admits specific kinds.
    #[error("Structural error at node {node_id}: {context}")]
    Structural { node_id: String, context: String },

    /// The graph returned zero or several groups where exactly one is required.
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OracleError {
    pub fn structural(node_id: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Structural {
            node_id: node_id.into(),
            context: context.into(),
        }
    }
}
