use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};
use super::{EventGraphStore, GraphSnapshot};
use crate::errors::OracleError;
use crate::models::{AbstractEvent, AbstractParseTree, Event, Node, Scope, Variable};

/// Event graph held in memory, indexed at load time.
pub struct MemoryGraph {
    abstract_events: Vec<AbstractEvent>,
    events: Vec<Event>,
    parse_trees: Vec<Node>,
    abstract_parse_trees: Vec<AbstractParseTree>,
    variables: Vec<Variable>,

    abstract_event_index: HashMap<String, usize>,
    event_index: HashMap<String, usize>,
    tree_index: HashMap<String, usize>,
    /// Any node uuid to the tree that holds it.
    node_index: HashMap<String, usize>,
    /// Parse tree uuid to the events it parses.
    events_by_tree: HashMap<String, Vec<usize>>,
    /// Parse tree uuid to the abstraction records over it.
    apts_by_tree: HashMap<String, Vec<usize>>,
    apts_by_uuid: HashMap<String, Vec<usize>>,
    variables_by_event: HashMap<String, Vec<usize>>,
}

impl MemoryGraph {
    pub async fn load(path: &Path) -> Result<Self, OracleError> {
        let snapshot = GraphSnapshot::read(path).await?;
        let graph = Self::from_snapshot(snapshot)?;
        debug!(
            path = %path.display(),
            events = graph.events.len(),
            trees = graph.parse_trees.len(),
            variables = graph.variables.len(),
            "Event graph loaded"
        );
        Ok(graph)
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, OracleError> {
        let GraphSnapshot {
            abstract_events,
            events,
            parse_trees,
            abstract_parse_trees,
            variables,
        } = snapshot;

        let abstract_event_index = unique_index(abstract_events.iter().map(|a| a.uuid.as_str()), "abstract event")?;
        let event_index = unique_index(events.iter().map(|e| e.uuid.as_str()), "event")?;
        let tree_index = unique_index(parse_trees.iter().map(|t| t.uuid.as_str()), "parse tree")?;

        let mut node_index = HashMap::new();
        for (i, tree) in parse_trees.iter().enumerate() {
            index_nodes(tree, i, &mut node_index);
        }

        let mut events_by_tree: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, event) in events.iter().enumerate() {
            if let Some(tree) = &event.parse_tree {
                if !tree_index.contains_key(tree) {
                    warn!(event = %event.uuid, tree = %tree, "Event refers to an unknown parse tree");
                }
                events_by_tree.entry(tree.clone()).or_default().push(i);
            }
        }

        // Duplicate abstraction uuids are kept on purpose: they surface as
        // multiple groups during classification.
        let mut apts_by_tree: HashMap<String, Vec<usize>> = HashMap::new();
        let mut apts_by_uuid: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, apt) in abstract_parse_trees.iter().enumerate() {
            apts_by_uuid.entry(apt.uuid.clone()).or_default().push(i);
            for tree in &apt.abstracts {
                apts_by_tree.entry(tree.clone()).or_default().push(i);
            }
        }

        let mut variables_by_event: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, var) in variables.iter().enumerate() {
            if !node_index.contains_key(&var.node) {
                warn!(variable = %var.uuid, node = %var.node, "Variable bound to an unknown node");
            }
            variables_by_event.entry(var.event.clone()).or_default().push(i);
        }

        Ok(Self {
            abstract_events,
            events,
            parse_trees,
            abstract_parse_trees,
            variables,
            abstract_event_index,
            event_index,
            tree_index,
            node_index,
            events_by_tree,
            apts_by_tree,
            apts_by_uuid,
            variables_by_event,
        })
    }

    /// Events parsed by any tree of one abstraction record.
    fn events_of_apt<'g>(&'g self, apt: &'g AbstractParseTree) -> impl Iterator<Item = &'g Event> + 'g {
        apt.abstracts
            .iter()
            .filter_map(move |tree| self.events_by_tree.get(tree))
            .flatten()
            .map(move |&i| &self.events[i])
    }
}

fn unique_index<'a>(ids: impl Iterator<Item = &'a str>, what: &str) -> Result<HashMap<String, usize>, OracleError> {
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        if index.insert(id.to_string(), i).is_some() {
            return Err(OracleError::Graph(format!("Duplicate {} uuid {}", what, id)));
        }
    }
    Ok(index)
}

fn index_nodes(node: &Node, tree: usize, index: &mut HashMap<String, usize>) {
    index.insert(node.uuid.clone(), tree);
    for child in node.children() {
        index_nodes(child, tree, index);
    }
}

impl EventGraphStore for MemoryGraph {
    fn abstract_events(&self) -> Vec<&AbstractEvent> {
        self.abstract_events.iter().collect()
    }

    fn abstract_event(&self, uuid: &str) -> Option<&AbstractEvent> {
        self.abstract_event_index.get(uuid).map(|&i| &self.abstract_events[i])
    }

    fn event(&self, uuid: &str) -> Option<&Event> {
        self.event_index.get(uuid).map(|&i| &self.events[i])
    }

    fn caused_events(&self, event_uuid: &str) -> Vec<&Event> {
        self.event(event_uuid)
            .map(|e| e.caused.iter().filter_map(|id| self.event(id)).collect())
            .unwrap_or_default()
    }

    fn parse_tree(&self, uuid: &str) -> Option<&Node> {
        self.tree_index.get(uuid).map(|&i| &self.parse_trees[i])
    }

    fn node(&self, uuid: &str) -> Option<&Node> {
        let tree = self.node_index.get(uuid)?;
        self.parse_trees[*tree].find(uuid)
    }

    fn variables_for_event(&self, event_uuid: &str) -> Vec<&Variable> {
        self.variables_by_event
            .get(event_uuid)
            .map(|ids| ids.iter().map(|&i| &self.variables[i]).collect())
            .unwrap_or_default()
    }

    fn abstract_queries_for_event(&self, event_uuid: &str) -> Vec<&AbstractParseTree> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for caused in self.caused_events(event_uuid) {
            let Some(tree) = &caused.parse_tree else { continue };
            for &i in self.apts_by_tree.get(tree).map(Vec::as_slice).unwrap_or(&[]) {
                let apt = &self.abstract_parse_trees[i];
                if seen.insert(apt.uuid.as_str()) {
                    out.push(apt);
                }
            }
        }
        out
    }

    fn query_occurrence_groups(&self, abstract_query_id: &str, scope: &Scope) -> Vec<usize> {
        let Some(records) = self.apts_by_uuid.get(abstract_query_id) else {
            return Vec::new();
        };
        records
            .iter()
            .map(|&i| {
                self.events_of_apt(&self.abstract_parse_trees[i])
                    .filter(|e| e.project == scope.project && e.session == scope.session && e.user == scope.user)
                    .map(|e| e.uuid.as_str())
                    .collect::<HashSet<_>>()
                    .len()
            })
            .filter(|&count| count > 0)
            .collect()
    }

    fn scopes_for_abstract_query(&self, abstract_query_id: &str) -> Vec<Scope> {
        let mut scopes: Vec<Scope> = self
            .apts_by_uuid
            .get(abstract_query_id)
            .into_iter()
            .flatten()
            .flat_map(|&i| self.events_of_apt(&self.abstract_parse_trees[i]))
            .map(|e| e.scope())
            .collect();
        scopes.sort();
        scopes.dedup();
        scopes
    }
}
