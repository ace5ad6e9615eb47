//! Per-operation counts of what the event graph models.

use std::collections::BTreeMap;
use serde::Serialize;
use tracing::warn;
use crate::classify::has_singleton_operation;
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::{BatchSummary, DmType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub project: String,
    pub operation: String,
    /// Abstract events recorded for the operation.
    pub operations: usize,
    /// Those with a request that caused at least one backend event.
    pub state_changing: usize,
    /// Those with a request that caused a singleton query in its own scope.
    pub singleton: usize,
}

/// Counts per (project, operation), sorted by project then operation.
pub fn collect(graph: &dyn EventGraphStore) -> Result<(Vec<OperationStats>, BatchSummary), OracleError> {
    let mut rows: BTreeMap<(String, String), OperationStats> = BTreeMap::new();
    let mut summary = BatchSummary::default();

    for ae in graph.abstract_events() {
        let row = rows
            .entry((ae.project.clone(), ae.operation.clone()))
            .or_insert_with(|| OperationStats {
                project: ae.project.clone(),
                operation: ae.operation.clone(),
                ..Default::default()
            });
        row.operations += 1;

        let requests: Vec<_> = graph
            .events_of(&ae.uuid, None)
            .into_iter()
            .filter(|e| e.dm_type == DmType::HttpRequest && !e.caused.is_empty())
            .collect();
        if requests.is_empty() {
            continue;
        }
        row.state_changing += 1;

        let mut singleton = false;
        for event in requests {
            match has_singleton_operation(graph, &event.uuid, &event.scope()) {
                Ok(true) => {
                    singleton = true;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(event = %event.uuid, error = %e, "Cannot classify request");
                    summary.absorb(e)?;
                }
            }
        }
        if singleton {
            row.singleton += 1;
        }
    }

    Ok((rows.into_values().collect(), summary))
}
