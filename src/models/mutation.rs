use serde::{Deserialize, Serialize};
use super::parse_tree::Node;

/// Point mutation applied while reconstructing a request.
///
/// The target is a terminal node identity. Without a replacement the node is
/// suppressed; with one, the literal takes the node's place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub target: String,
    pub replacement: Option<String>,
}

impl Mutation {
    pub fn strip(target: &str) -> Self {
        Self { target: target.to_string(), replacement: None }
    }

    pub fn replace(target: &str, value: &str) -> Self {
        Self {
            target: target.to_string(),
            replacement: Some(value.to_string()),
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.target == node.uuid
    }
}
