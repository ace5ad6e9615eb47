use indexmap::IndexMap;
use tracing::trace;
use super::{EncodedBody, Reconstructor};
use crate::errors::OracleError;
use crate::models::{ConcreteRequest, DmType, Node, NodeKind};

pub const HEADER_FIELD: &str = "header-field";
pub const METHOD: &str = "method";
pub const BODY: &str = "body";

impl Reconstructor<'_> {
    /// Depth-first walk of a request tree into a concrete request.
    pub fn request(&mut self, tree: &Node) -> Result<ConcreteRequest, OracleError> {
        let mut method = String::new();
        let mut url = String::new();
        let mut headers: IndexMap<String, String> = IndexMap::new();
        let mut encoded: Option<EncodedBody> = None;

        let mut stack: Vec<&Node> = tree.sorted_children();
        stack.reverse();

        while let Some(node) = stack.pop() {
            trace!(node = %node.uuid, s_type = %node.s_type, "Visiting request node");
            match &node.kind {
                NodeKind::Terminal { symbol } if node.s_type == METHOD => {
                    method = symbol.clone();
                }
                NodeKind::Terminal { .. } => {
                    return Err(OracleError::structural(
                        &node.uuid,
                        format!("unexpected terminal '{}' in request", node.s_type),
                    ));
                }
                NodeKind::NonTerminal { .. } if node.s_type == HEADER_FIELD => {
                    let (name, value) = self.header_field(node)?;
                    headers.insert(name, value);
                }
                NodeKind::NonTerminal { .. } => match node.dm_type {
                    Some(DmType::Url) => url = self.url(node)?,
                    Some(dm) if dm.body_kind().is_some() => encoded = Some(self.body(node)?),
                    None if node.s_type == BODY => encoded = Some(self.body(node)?),
                    Some(other) => {
                        return Err(OracleError::structural(
                            &node.uuid,
                            format!("unexpected embedded {} tree in request", other),
                        ));
                    }
                    None => {
                        let mut children = node.sorted_children();
                        children.reverse();
                        stack.extend(children);
                    }
                },
            }
        }

        let mut body = None;
        if let Some(encoded) = encoded {
            if let Some(content_type) = encoded.content_type.filter(|c| !c.is_empty()) {
                set_content_type(&mut headers, content_type);
            }
            body = Some(encoded.body);
        }

        Ok(ConcreteRequest { method, url, headers, body })
    }

    fn header_field(&mut self, node: &Node) -> Result<(String, String), OracleError> {
        let children = node.sorted_children();
        let (mut name, mut value) = match children.as_slice() {
            [name, value] => (*name, *value),
            _ => {
                return Err(OracleError::structural(
                    &node.uuid,
                    "header field must hold a name and a value",
                ));
            }
        };
        if !name.is_terminal() && value.is_terminal() {
            std::mem::swap(&mut name, &mut value);
        }

        let name = name
            .symbol()
            .ok_or_else(|| OracleError::structural(&name.uuid, "header name must be a terminal"))?
            .to_string();

        let value = match (&value.kind, value.dm_type) {
            (NodeKind::Terminal { .. }, _) => self.leaf(value, "header value")?.text().unwrap_or("").to_string(),
            (NodeKind::NonTerminal { .. }, Some(DmType::Url)) => self.url(value)?,
            (NodeKind::NonTerminal { .. }, Some(DmType::Cookie)) => self.cookie_header(value)?,
            (NodeKind::NonTerminal { .. }, _) => {
                return Err(OracleError::structural(
                    &value.uuid,
                    format!("unexpected '{}' value in header {}", value.s_type, name),
                ));
            }
        };

        Ok((name, value))
    }
}

/// The body encoding is authoritative over a captured Content-Type.
fn set_content_type(headers: &mut IndexMap<String, String>, content_type: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
        Some((_, v)) => *v = content_type,
        None => {
            headers.insert("Content-Type".to_string(), content_type);
        }
    }
}
