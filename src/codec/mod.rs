//! Rebuilds concrete HTTP requests from captured parse trees.
//!
//! Every reconstruction may carry one [`Mutation`]: the targeted terminal is
//! suppressed or replaced, everything else is reproduced verbatim. Children
//! of a nonterminal are always visited in `pos` order.

pub mod body;
pub mod cookie;
pub mod form;
pub mod json;
pub mod multipart;
pub mod request;
pub mod url;

use serde::Serialize;
use tracing::{debug, warn};
use crate::errors::OracleError;
use crate::models::{ConcreteRequest, Mutation, Node};

pub use body::EncodedBody;
pub use form::ParamMultimap;

/// A recoverable irregularity met while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub node_id: String,
    pub description: String,
}

/// Result of a full request reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub request: ConcreteRequest,
    /// Number of times the mutation target was met during the walk.
    pub mutation_hits: usize,
    pub anomalies: Vec<Anomaly>,
}

impl Reconstruction {
    pub fn mutation_applied(&self) -> bool {
        self.mutation_hits > 0
    }
}

/// What a terminal contributes to the output after the mutation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Leaf<'a> {
    Original(&'a str),
    Replaced(&'a str),
    Suppressed,
}

impl<'a> Leaf<'a> {
    /// The text to emit, or `None` when the terminal is suppressed.
    pub(crate) fn text(self) -> Option<&'a str> {
        match self {
            Leaf::Original(s) | Leaf::Replaced(s) => Some(s),
            Leaf::Suppressed => None,
        }
    }
}

/// Per-call reconstruction state. Holds no shared data, so independent
/// reconstructions can run concurrently.
pub struct Reconstructor<'m> {
    mutation: Option<&'m Mutation>,
    hits: usize,
    anomalies: Vec<Anomaly>,
}

impl<'m> Reconstructor<'m> {
    pub fn new(mutation: Option<&'m Mutation>) -> Self {
        Self { mutation, hits: 0, anomalies: Vec::new() }
    }

    pub fn mutation_hits(&self) -> usize {
        self.hits
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn into_anomalies(self) -> Vec<Anomaly> {
        self.anomalies
    }

    /// Resolve a terminal against the mutation.
    pub(crate) fn leaf<'a>(&mut self, node: &'a Node, context: &str) -> Result<Leaf<'a>, OracleError>
    where
        'm: 'a,
    {
        let symbol = node.symbol().ok_or_else(|| {
            OracleError::structural(&node.uuid, format!("expected a terminal in {}", context))
        })?;

        match self.mutation {
            Some(m) if m.matches(node) => {
                self.hits += 1;
                debug!(node = %node.uuid, s_type = %node.s_type, symbol = %symbol, "Mutating terminal");
                Ok(match &m.replacement {
                    Some(r) => Leaf::Replaced(r.as_str()),
                    None => Leaf::Suppressed,
                })
            }
            _ => Ok(Leaf::Original(symbol)),
        }
    }

    pub(crate) fn anomaly(&mut self, node: &Node, description: &str) {
        warn!(node = %node.uuid, s_type = %node.s_type, "{}", description);
        self.anomalies.push(Anomaly {
            node_id: node.uuid.clone(),
            description: description.to_string(),
        });
    }

    /// Split a name/value pair nonterminal into its two terminals.
    pub(crate) fn pair_terminals<'a>(&self, pair: &'a Node, context: &str) -> Result<(&'a Node, &'a Node), OracleError> {
        let children = pair.sorted_children();
        match children.as_slice() {
            [name, value] if name.is_terminal() && value.is_terminal() => Ok((name, value)),
            _ => Err(OracleError::structural(
                &pair.uuid,
                format!("{} must hold exactly a name and a value terminal", context),
            )),
        }
    }
}

/// Reconstruct a full request, optionally applying one mutation.
pub fn reconstruct(tree: &Node, mutation: Option<&Mutation>) -> Result<Reconstruction, OracleError> {
    let mut r = Reconstructor::new(mutation);
    let request = r.request(tree)?;
    Ok(Reconstruction {
        request,
        mutation_hits: r.mutation_hits(),
        anomalies: r.into_anomalies(),
    })
}

pub fn url(tree: &Node, mutation: Option<&Mutation>) -> Result<String, OracleError> {
    Reconstructor::new(mutation).url(tree)
}

pub fn query_string(tree: &Node, mutation: Option<&Mutation>) -> Result<String, OracleError> {
    Reconstructor::new(mutation).query_string(tree)
}

pub fn cookie_header(tree: &Node, mutation: Option<&Mutation>) -> Result<String, OracleError> {
    Reconstructor::new(mutation).cookie_header(tree)
}

pub fn body(tree: &Node, mutation: Option<&Mutation>) -> Result<EncodedBody, OracleError> {
    Reconstructor::new(mutation).body(tree)
}

pub fn request(tree: &Node, mutation: Option<&Mutation>) -> Result<ConcreteRequest, OracleError> {
    Reconstructor::new(mutation).request(tree)
}
