use serde::{Deserialize, Serialize};
use super::verdict::QueryPattern;

/// Classification of one backend query executed during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResult {
    pub seq_id: i64,
    pub query_message: String,
    pub query_hash: String,
    /// Modeled abstraction the hash matched, if any.
    pub abstract_query_id: Option<String>,
    /// The hash belongs to the modeled state change.
    pub observed: bool,
    /// The hash never fired in any baseline run.
    pub unique: bool,
    pub trace_pattern: Option<QueryPattern>,
}

impl OracleResult {
    pub fn trace_pattern_label(&self) -> &'static str {
        self.trace_pattern.map(|p| p.as_str()).unwrap_or("NOT_FOUND")
    }
}
