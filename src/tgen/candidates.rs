use std::collections::HashSet;
use tracing::debug;
use crate::graph::EventGraphStore;
use crate::models::{AbstractEvent, DmType, Event, Scope, Variable, SESSION_UNIQUE, USER_UNIQUE};

/// Which operations a generation run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub project: String,
    /// All operations of the project when absent.
    pub operation: Option<String>,
}

impl Selection {
    pub fn matches(&self, ae: &AbstractEvent) -> bool {
        ae.dm_type == DmType::AbsHttpRequest
            && ae.project == self.project
            && self.operation.as_ref().map_or(true, |op| &ae.operation == op)
    }
}

/// A token variable chosen for stripping or forging.
#[derive(Debug, Clone)]
pub struct TokenTarget {
    pub variable: Variable,
    /// `session_unique` or `user_unique`.
    pub label: &'static str,
}

/// One request to turn into a test case.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Enumeration order, the final tie-breaker when sorting output.
    pub index: usize,
    pub project: String,
    pub operation: String,
    pub abstract_event_id: String,
    pub event_id: String,
    pub scope: Scope,
    pub token: Option<TokenTarget>,
}

impl Candidate {
    fn new(index: usize, ae: &AbstractEvent, event: &Event, token: Option<TokenTarget>) -> Self {
        Self {
            index,
            project: ae.project.clone(),
            operation: ae.operation.clone(),
            abstract_event_id: ae.uuid.clone(),
            event_id: event.uuid.clone(),
            scope: event.scope(),
            token,
        }
    }

    pub fn variable_name(&self) -> &str {
        self.token.as_ref().map(|t| t.variable.name.as_str()).unwrap_or("")
    }
}

fn selected<'g>(graph: &'g dyn EventGraphStore, selection: &Selection) -> Vec<&'g AbstractEvent> {
    graph.abstract_events().into_iter().filter(|ae| selection.matches(ae)).collect()
}

/// Parsed HTTP requests of an abstract event that caused at least one other event.
fn state_changing_requests<'g>(graph: &'g dyn EventGraphStore, ae: &AbstractEvent) -> Vec<&'g Event> {
    graph
        .events_of(&ae.uuid, None)
        .into_iter()
        .filter(|e| e.dm_type == DmType::HttpRequest && !e.caused.is_empty() && e.parse_tree.is_some())
        .collect()
}

/// The first state-changing request of every selected operation.
pub fn request_candidates(graph: &dyn EventGraphStore, selection: &Selection) -> Vec<Candidate> {
    let mut out = Vec::new();
    for ae in selected(graph, selection) {
        match state_changing_requests(graph, ae).first() {
            Some(event) => out.push(Candidate::new(out.len(), ae, event, None)),
            None => debug!(abstract_event = %ae.uuid, "No state-changing request"),
        }
    }
    out
}

/// Unique, non-user-generated variables of every selected operation, one per
/// (operation, label, variable name), session-unique ones first.
pub fn token_candidates(graph: &dyn EventGraphStore, selection: &Selection) -> Vec<Candidate> {
    let operations = selected(graph, selection);
    let mut seen: HashSet<(String, &'static str, String)> = HashSet::new();
    let mut out = Vec::new();

    for label in [SESSION_UNIQUE, USER_UNIQUE] {
        for ae in &operations {
            for event in state_changing_requests(graph, ae) {
                for var in graph.variables_for_event(&event.uuid) {
                    if !var.has_semtype(label) || var.is_user_generated() {
                        continue;
                    }
                    if !seen.insert((ae.uuid.clone(), label, var.name.clone())) {
                        continue;
                    }
                    let token = TokenTarget { variable: var.clone(), label };
                    out.push(Candidate::new(out.len(), ae, event, Some(token)));
                }
            }
        }
    }
    debug!(candidates = out.len(), "Token candidates enumerated");
    out
}
