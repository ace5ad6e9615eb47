//! Read-only access to the captured event graph.

pub mod memory;
pub mod snapshot;

pub use memory::MemoryGraph;
pub use snapshot::GraphSnapshot;

use crate::models::{AbstractEvent, AbstractParseTree, DmType, Event, Node, Scope, Variable};

/// Lookups the analysis needs from the event graph. Implementations never
/// mutate graph data and must be shareable across worker tasks.
pub trait EventGraphStore: Send + Sync {
    fn abstract_events(&self) -> Vec<&AbstractEvent>;

    fn abstract_event(&self, uuid: &str) -> Option<&AbstractEvent>;

    fn event(&self, uuid: &str) -> Option<&Event>;

    /// Events causally produced by `event_uuid`, e.g. the query traces of a request.
    fn caused_events(&self, event_uuid: &str) -> Vec<&Event>;

    /// Root of a parse tree.
    fn parse_tree(&self, uuid: &str) -> Option<&Node>;

    /// Any node of any parse tree, by identity.
    fn node(&self, uuid: &str) -> Option<&Node>;

    fn variables_for_event(&self, event_uuid: &str) -> Vec<&Variable>;

    /// Distinct abstract parse trees over the events caused by `event_uuid`.
    fn abstract_queries_for_event(&self, event_uuid: &str) -> Vec<&AbstractParseTree>;

    /// For each stored abstraction record with this uuid that has occurrences
    /// in `scope`, the number of distinct concrete events it abstracts there.
    /// A healthy abstraction yields exactly one group.
    fn query_occurrence_groups(&self, abstract_query_id: &str, scope: &Scope) -> Vec<usize>;

    /// (project, session, user) triples in which the abstraction occurs.
    fn scopes_for_abstract_query(&self, abstract_query_id: &str) -> Vec<Scope>;

    /// Concrete events of an abstract event, optionally restricted to a scope, in stored order.
    fn events_of(&self, abstract_event_id: &str, scope: Option<&Scope>) -> Vec<&Event> {
        let Some(ae) = self.abstract_event(abstract_event_id) else {
            return Vec::new();
        };
        ae.events
            .iter()
            .filter_map(|id| self.event(id))
            .filter(|e| scope.map_or(true, |s| e.project == s.project && e.session == s.session && e.user == s.user))
            .collect()
    }

    /// First concrete HTTP request of an abstract event in a scope.
    fn request_event_in_scope(&self, abstract_event_id: &str, scope: &Scope) -> Option<&Event> {
        self.events_of(abstract_event_id, Some(scope))
            .into_iter()
            .find(|e| e.dm_type == DmType::HttpRequest)
    }

    /// Parse tree root of an event, if the event was parsed.
    fn tree_of(&self, event: &Event) -> Option<&Node> {
        event.parse_tree.as_deref().and_then(|id| self.parse_tree(id))
    }
}
