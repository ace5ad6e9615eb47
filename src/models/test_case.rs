use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A concrete, replayable HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteRequest {
    pub method: String,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
}

impl ConcreteRequest {
    /// Header lookup ignoring name case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A generated CSRF test case. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub seq_id: i64,
    /// Identifies the generation run that produced the test case.
    pub batch_id: String,
    pub created_at: DateTime<Utc>,
    pub project: String,
    pub session: String,
    pub operation: String,
    pub user: String,
    /// Abstract request event the test case was generated from.
    pub request_event_id: String,
    pub mutated_node_id: Option<String>,
    pub source_var_id: Option<String>,
    pub sink_var_id: Option<String>,
    pub request: ConcreteRequest,
}
