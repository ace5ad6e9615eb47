use tracing::{debug, info, warn};
use crate::classify::{has_singleton_operation, ProtectionPolicy};
use crate::codec::{self, Anomaly};
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::{ConcreteRequest, Mutation, SESSION_UNIQUE};
use super::candidates::{Candidate, TokenTarget};
use super::GenerationMode;

/// Why a candidate produced no test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The request causes no singleton query in its scope.
    NoSingleton,
    /// Protection status does not match the requested mode.
    NotSelected,
    Denylisted,
    /// No same-named value from another session or user to forge with.
    NoReplacement,
    /// The token's node is not part of the request tree.
    TargetNotReached,
}

/// A reconstructed request ready to be numbered and stored.
#[derive(Debug, Clone)]
pub struct Generated {
    pub candidate: Candidate,
    pub mutation: Option<Mutation>,
    pub request: ConcreteRequest,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    Generated(Box<Generated>),
    Skipped(SkipReason),
}

pub fn evaluate_candidate(
    graph: &dyn EventGraphStore,
    policy: &ProtectionPolicy,
    mode: GenerationMode,
    candidate: &Candidate,
) -> Result<CandidateOutcome, OracleError> {
    let event = graph
        .event(&candidate.event_id)
        .ok_or_else(|| OracleError::Graph(format!("Unknown event {}", candidate.event_id)))?;
    let tree = graph
        .tree_of(event)
        .ok_or_else(|| OracleError::Graph(format!("Event {} has no parse tree", event.uuid)))?;

    let mutation = match mode {
        GenerationMode::Protected | GenerationMode::NotProtected => {
            if !has_singleton_operation(graph, &event.uuid, &candidate.scope)? {
                debug!(event = %event.uuid, "Skipping, no singleton operation");
                return Ok(CandidateOutcome::Skipped(SkipReason::NoSingleton));
            }
            let protected = policy.is_protected(graph.variables_for_event(&event.uuid));
            if protected != (mode == GenerationMode::Protected) {
                debug!(event = %event.uuid, protected, "Skipping, protection status not selected");
                return Ok(CandidateOutcome::Skipped(SkipReason::NotSelected));
            }
            None
        }
        GenerationMode::Tokens | GenerationMode::ForgedTokens => {
            let target = candidate
                .token
                .as_ref()
                .ok_or_else(|| OracleError::Internal("Token candidate without a target variable".into()))?;
            let var = &target.variable;
            if policy.is_denylisted(&var.name) {
                debug!(variable = %var.name, "Skipping, variable is denylisted");
                return Ok(CandidateOutcome::Skipped(SkipReason::Denylisted));
            }
            if !has_singleton_operation(graph, &event.uuid, &candidate.scope)? {
                debug!(event = %event.uuid, variable = %var.name, "Skipping, no singleton operation");
                return Ok(CandidateOutcome::Skipped(SkipReason::NoSingleton));
            }
            if mode == GenerationMode::ForgedTokens {
                match forged_value(graph, candidate, target) {
                    Some(value) => Some(Mutation::replace(&var.node, &value)),
                    None => {
                        debug!(variable = %var.name, "Skipping, no value to forge with");
                        return Ok(CandidateOutcome::Skipped(SkipReason::NoReplacement));
                    }
                }
            } else {
                Some(Mutation::strip(&var.node))
            }
        }
    };

    let rec = codec::reconstruct(tree, mutation.as_ref())?;
    if mutation.is_some() && !rec.mutation_applied() {
        warn!(event = %event.uuid, variable = candidate.variable_name(), "Token node not found in request tree");
        return Ok(CandidateOutcome::Skipped(SkipReason::TargetNotReached));
    }

    info!(
        project = %candidate.project,
        operation = %candidate.operation,
        variable = candidate.variable_name(),
        method = %rec.request.method,
        url = %rec.request.url,
        "Exporting test case"
    );
    Ok(CandidateOutcome::Generated(Box::new(Generated {
        candidate: candidate.clone(),
        mutation,
        request: rec.request,
        anomalies: rec.anomalies,
    })))
}

/// Value of the same-named variable seen in another session (session-unique
/// tokens) or by another user (user-unique tokens) of the same operation.
fn forged_value(graph: &dyn EventGraphStore, candidate: &Candidate, target: &TokenTarget) -> Option<String> {
    let scope = &candidate.scope;
    graph
        .events_of(&candidate.abstract_event_id, None)
        .into_iter()
        .filter(|e| {
            if target.label == SESSION_UNIQUE {
                e.session != scope.session
            } else {
                e.user != scope.user
            }
        })
        .flat_map(|e| graph.variables_for_event(&e.uuid))
        .find(|v| v.name == target.variable.name)
        .map(|v| v.value.clone())
}
