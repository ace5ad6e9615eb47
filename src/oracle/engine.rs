use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, trace, warn};
use crate::classify::classified_queries;
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::{OracleResult, QueryPattern, Scope, TestCase, Verdict};
use super::baseline::BaselineCorpus;
use super::hashing::{query_hash, sanitize};

/// VULNERABLE iff some executed query is both modeled and absent from the baseline.
/// The order of `executed` never matters.
pub fn judge<S: AsRef<str>>(modeled: &HashSet<String>, executed: &[S], baseline: &BaselineCorpus) -> Verdict {
    let hit = executed.iter().any(|h| {
        let h: &str = h.as_ref();
        modeled.contains(h) && !baseline.contains(h)
    });
    if hit {
        Verdict::Vulnerable
    } else {
        Verdict::NotVulnerable
    }
}

/// What the model expects a test case's operation to change.
#[derive(Debug, Clone, Default)]
pub struct ModeledState {
    /// Messages of the singleton abstract queries: the state-change anchors.
    pub singletons: HashSet<String>,
    /// Every abstract query of the request, by message.
    pub patterns: HashMap<String, (String, QueryPattern)>,
}

/// A backend query fired during replay, sanitized and hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedQuery {
    pub message: String,
    pub hash: String,
}

impl ExecutedQuery {
    pub fn new(raw: &str) -> Self {
        let message = sanitize(raw).to_string();
        let hash = query_hash(&message);
        Self { message, hash }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCaseReport {
    pub test_case: TestCase,
    pub modeled: usize,
    pub results: Vec<OracleResult>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    Verdict(TestCaseReport),
    /// No singleton anchor exists for the operation; no verdict is possible.
    Inconclusive { seq_id: i64, reason: String },
}

impl Evaluation {
    pub fn seq_id(&self) -> i64 {
        match self {
            Evaluation::Verdict(r) => r.test_case.seq_id,
            Evaluation::Inconclusive { seq_id, .. } => *seq_id,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Evaluation::Verdict(r) => Some(r.verdict),
            Evaluation::Inconclusive { .. } => None,
        }
    }
}

/// Judges replayed test cases against the model and a shared baseline.
pub struct Oracle<'g> {
    graph: &'g dyn EventGraphStore,
    baseline: Arc<BaselineCorpus>,
}

impl<'g> Oracle<'g> {
    pub fn new(graph: &'g dyn EventGraphStore, baseline: Arc<BaselineCorpus>) -> Self {
        Self { graph, baseline }
    }

    /// Abstract queries the operation's request caused in the test case's scope.
    pub fn modeled_state(&self, tc: &TestCase) -> Result<ModeledState, OracleError> {
        let scope = Scope::new(&tc.project, &tc.session, &tc.user);
        let event = self
            .graph
            .request_event_in_scope(&tc.request_event_id, &scope)
            .ok_or_else(|| {
                OracleError::Graph(format!(
                    "No request event of {} in {}",
                    tc.request_event_id, scope
                ))
            })?;

        let mut state = ModeledState::default();
        for c in classified_queries(self.graph, &event.uuid, &scope)? {
            if c.pattern == QueryPattern::Singleton {
                state.singletons.insert(c.query.message.clone());
            }
            state
                .patterns
                .insert(c.query.message.clone(), (c.query.uuid.clone(), c.pattern));
        }
        Ok(state)
    }

    /// Run one test case through modeled, executed, matched and verdict.
    pub fn evaluate(&self, tc: &TestCase, executed_raw: &[String]) -> Result<Evaluation, OracleError> {
        let modeled = self.modeled_state(tc)?;
        if modeled.singletons.is_empty() {
            warn!(seq_id = tc.seq_id, request = %tc.request_event_id, "No singleton operation, test case inconclusive");
            return Ok(Evaluation::Inconclusive {
                seq_id: tc.seq_id,
                reason: format!("no singleton operation for {}", tc.request_event_id),
            });
        }
        trace!(seq_id = tc.seq_id, modeled = modeled.singletons.len(), "Modeled state");

        let mut executed: Vec<ExecutedQuery> = executed_raw.iter().map(|q| ExecutedQuery::new(q)).collect();
        // Display order only.
        executed.sort_by(|a, b| a.message.cmp(&b.message));
        trace!(seq_id = tc.seq_id, executed = executed.len(), "Executed queries loaded");

        let results: Vec<OracleResult> = executed
            .into_iter()
            .map(|q| {
                let observed = modeled.singletons.contains(&q.hash);
                let unique = !self.baseline.contains(&q.hash);
                let known = modeled.patterns.get(&q.hash);
                OracleResult {
                    seq_id: tc.seq_id,
                    query_message: q.message,
                    query_hash: q.hash,
                    abstract_query_id: known.map(|(id, _)| id.clone()),
                    observed,
                    unique,
                    trace_pattern: known.map(|(_, p)| *p),
                }
            })
            .collect();

        let hashes: Vec<&str> = results.iter().map(|r| r.query_hash.as_str()).collect();
        let verdict = judge(&modeled.singletons, &hashes, &self.baseline);
        debug!(seq_id = tc.seq_id, verdict = %verdict, queries = results.len(), "Test case judged");

        Ok(Evaluation::Verdict(TestCaseReport {
            test_case: tc.clone(),
            modeled: modeled.singletons.len(),
            results,
            verdict,
        }))
    }
}
