//! Test case generation over the event graph.

pub mod candidates;
pub mod evaluate;

pub use candidates::{request_candidates, token_candidates, Candidate, Selection, TokenTarget};
pub use evaluate::{evaluate_candidate, CandidateOutcome, Generated, SkipReason};

use std::sync::Arc;
use chrono::Utc;
use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use crate::classify::ProtectionPolicy;
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::{BatchSummary, TestCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Unmutated requests of protected singleton operations.
    Protected,
    /// Unmutated requests of unprotected singleton operations.
    NotProtected,
    /// One request per token with the token stripped.
    Tokens,
    /// One request per token with a token from another session or user.
    ForgedTokens,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Protected => "protected",
            Self::NotProtected => "not_protected",
            Self::Tokens => "tokens",
            Self::ForgedTokens => "tokens --forge",
        }
    }
}

/// A stored-ready test case with the context needed to print it.
#[derive(Debug, Clone)]
pub struct GeneratedTestCase {
    pub test_case: TestCase,
    pub label: Option<&'static str>,
    pub variable_name: Option<String>,
    pub variable_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub batch_id: String,
    pub test_cases: Vec<GeneratedTestCase>,
    pub summary: BatchSummary,
}

impl GenerationReport {
    /// Shift numbering so the batch starts at `first`, keeping its order.
    pub fn renumber_from(&mut self, first: i64) {
        for (i, case) in self.test_cases.iter_mut().enumerate() {
            case.test_case.seq_id = first + i as i64;
        }
    }
}

/// Evaluates candidates concurrently and numbers the results deterministically.
pub struct Generator {
    graph: Arc<dyn EventGraphStore>,
    policy: Arc<ProtectionPolicy>,
    max_parallel: usize,
}

impl Generator {
    pub fn new(graph: Arc<dyn EventGraphStore>, policy: Arc<ProtectionPolicy>, max_parallel: usize) -> Self {
        Self { graph, policy, max_parallel: max_parallel.max(1) }
    }

    pub fn candidates(&self, mode: GenerationMode, selection: &Selection) -> Vec<Candidate> {
        match mode {
            GenerationMode::Protected | GenerationMode::NotProtected => {
                request_candidates(self.graph.as_ref(), selection)
            }
            GenerationMode::Tokens | GenerationMode::ForgedTokens => {
                token_candidates(self.graph.as_ref(), selection)
            }
        }
    }

    pub async fn run(
        &self,
        mode: GenerationMode,
        selection: &Selection,
        progress: &ProgressBar,
    ) -> Result<GenerationReport, OracleError> {
        let candidates = self.candidates(mode, selection);
        info!(mode = mode.as_str(), project = %selection.project, candidates = candidates.len(), "Generating test cases");
        progress.set_length(candidates.len() as u64);

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let handles: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let graph = self.graph.clone();
                let policy = self.policy.clone();
                let semaphore = semaphore.clone();
                let progress = progress.clone();
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| OracleError::Internal(format!("Worker pool closed: {}", e)))?;
                    let outcome = tokio::task::spawn_blocking(move || {
                        evaluate_candidate(graph.as_ref(), &policy, mode, &candidate)
                    })
                    .await
                    .map_err(|e| OracleError::Internal(format!("Candidate task failed: {}", e)))?;
                    progress.inc(1);
                    outcome
                })
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let mut summary = BatchSummary::default();
        let mut generated = Vec::new();
        for result in results {
            match result {
                Ok(Ok(CandidateOutcome::Generated(g))) => generated.push(*g),
                Ok(Ok(CandidateOutcome::Skipped(_))) => summary.skipped += 1,
                Ok(Err(e)) => {
                    let kind = e.classify().error_type;
                    warn!(error = %e, kind, "Candidate failed");
                    summary.absorb(e)?;
                }
                Err(e) => {
                    error!(error = %e, "Generation task panicked");
                    return Err(OracleError::Internal(format!("Generation task panicked: {}", e)));
                }
            }
        }
        progress.finish_and_clear();
        summary.anomalies = generated.iter().map(|g| g.anomalies.len()).sum();

        // Parallel completion order must not leak into numbering.
        generated.sort_by(|a, b| {
            (&a.candidate.project, &a.candidate.operation, a.candidate.variable_name(), a.candidate.index).cmp(&(
                &b.candidate.project,
                &b.candidate.operation,
                b.candidate.variable_name(),
                b.candidate.index,
            ))
        });

        let batch_id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let test_cases: Vec<GeneratedTestCase> = generated
            .into_iter()
            .enumerate()
            .map(|(i, g)| {
                let Generated { candidate, mutation, request, .. } = g;
                let token = candidate.token.as_ref();
                GeneratedTestCase {
                    label: token.map(|t| t.label),
                    variable_name: token.map(|t| t.variable.name.clone()),
                    variable_value: token.map(|t| t.variable.value.clone()),
                    test_case: TestCase {
                        seq_id: i as i64 + 1,
                        batch_id: batch_id.clone(),
                        created_at,
                        project: candidate.project.clone(),
                        session: candidate.scope.session.clone(),
                        operation: candidate.operation.clone(),
                        user: candidate.scope.user.clone(),
                        request_event_id: candidate.abstract_event_id.clone(),
                        mutated_node_id: mutation.map(|m| m.target),
                        source_var_id: token.map(|t| t.variable.uuid.clone()),
                        sink_var_id: None,
                        request,
                    },
                }
            })
            .collect();

        summary.generated = test_cases.len();
        info!(batch = %batch_id, %summary, "Generation finished");
        Ok(GenerationReport { batch_id, test_cases, summary })
    }
}
