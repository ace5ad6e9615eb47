use tracing::debug;
use crate::errors::OracleError;
use crate::graph::EventGraphStore;
use crate::models::{AbstractParseTree, QueryPattern, Scope};

/// An abstract query caused by a request, with its pattern in the request's scope.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedQuery<'g> {
    pub query: &'g AbstractParseTree,
    pub pattern: QueryPattern,
}

/// Singleton when the abstraction fires exactly once in the scope.
pub fn classify_query(
    graph: &dyn EventGraphStore,
    abstract_query_id: &str,
    scope: &Scope,
) -> Result<QueryPattern, OracleError> {
    let groups = graph.query_occurrence_groups(abstract_query_id, scope);
    match groups.as_slice() {
        [1] => Ok(QueryPattern::Singleton),
        [_] => Ok(QueryPattern::Repeated),
        [] => Err(OracleError::Integrity(format!(
            "Abstract query {} has no occurrences in {}",
            abstract_query_id, scope
        ))),
        many => Err(OracleError::Integrity(format!(
            "Abstract query {} splits into {} groups in {}",
            abstract_query_id,
            many.len(),
            scope
        ))),
    }
}

/// Classify every abstract query caused by a request event.
pub fn classified_queries<'g>(
    graph: &'g dyn EventGraphStore,
    event_id: &str,
    scope: &Scope,
) -> Result<Vec<ClassifiedQuery<'g>>, OracleError> {
    graph
        .abstract_queries_for_event(event_id)
        .into_iter()
        .map(|query| {
            let pattern = classify_query(graph, &query.uuid, scope)?;
            debug!(event = %event_id, abstract_query = %query.uuid, pattern = %pattern, "Classified abstract query");
            Ok(ClassifiedQuery { query, pattern })
        })
        .collect()
}

pub fn singleton_operations<'g>(
    graph: &'g dyn EventGraphStore,
    event_id: &str,
    scope: &Scope,
) -> Result<Vec<&'g AbstractParseTree>, OracleError> {
    Ok(classified_queries(graph, event_id, scope)?
        .into_iter()
        .filter(|c| c.pattern == QueryPattern::Singleton)
        .map(|c| c.query)
        .collect())
}

/// True when the request caused at least one singleton query in its scope.
pub fn has_singleton_operation(
    graph: &dyn EventGraphStore,
    event_id: &str,
    scope: &Scope,
) -> Result<bool, OracleError> {
    Ok(!singleton_operations(graph, event_id, scope)?.is_empty())
}
