use serde_json::{Map, Number, Value};
use super::{Leaf, Reconstructor};
use crate::errors::OracleError;
use crate::models::{Node, NodeKind};

pub const JSON_OBJECT: &str = "json-object";
pub const JSON_ARRAY: &str = "json-array";
pub const JSON_MEMBER: &str = "json-member";
pub const JSON_KEY: &str = "json-key";
pub const JSON_STRING: &str = "json-string";
pub const JSON_INT: &str = "json-number-int";
pub const JSON_REAL: &str = "json-number-real";
pub const JSON_BOOL: &str = "json-number-bool";
pub const JSON_NULL: &str = "json-number-null";

impl Reconstructor<'_> {
    /// Rebuild a JSON body and serialize it compactly, keeping member order.
    pub fn json(&mut self, tree: &Node) -> Result<String, OracleError> {
        let value = self.json_value(tree)?;
        Ok(serde_json::to_string(&value)?)
    }

    /// The body root is either the top-level container itself or wraps exactly one.
    pub fn json_value(&mut self, tree: &Node) -> Result<Value, OracleError> {
        let root = match tree.s_type.as_str() {
            JSON_OBJECT | JSON_ARRAY => tree,
            _ => match tree.sorted_children().as_slice() {
                [only] => *only,
                _ => {
                    return Err(OracleError::structural(
                        &tree.uuid,
                        "JSON body must wrap exactly one top-level value",
                    ));
                }
            },
        };
        // A suppressed top-level scalar leaves an empty document.
        Ok(self.json_node(root)?.unwrap_or(Value::Null))
    }

    /// `None` means the node was suppressed and its slot should disappear.
    fn json_node(&mut self, node: &Node) -> Result<Option<Value>, OracleError> {
        match (&node.kind, node.s_type.as_str()) {
            (NodeKind::NonTerminal { .. }, JSON_OBJECT) => {
                let mut object = Map::new();
                for member in node.sorted_children() {
                    if let Some((key, value)) = self.json_member(member)? {
                        object.insert(key, value);
                    }
                }
                Ok(Some(Value::Object(object)))
            }
            (NodeKind::NonTerminal { .. }, JSON_ARRAY) => {
                let mut items = Vec::new();
                for element in node.sorted_children() {
                    if let Some(value) = self.json_node(element)? {
                        items.push(value);
                    }
                }
                Ok(Some(Value::Array(items)))
            }
            (NodeKind::Terminal { .. }, kind) => match self.leaf(node, "JSON leaf")? {
                Leaf::Suppressed => Ok(None),
                Leaf::Original(text) => json_leaf(node, kind, text, false).map(Some),
                Leaf::Replaced(text) => json_leaf(node, kind, text, true).map(Some),
            },
            (NodeKind::NonTerminal { .. }, other) => Err(OracleError::structural(
                &node.uuid,
                format!("unrecognized JSON branch '{}'", other),
            )),
        }
    }

    fn json_member(&mut self, member: &Node) -> Result<Option<(String, Value)>, OracleError> {
        let children = member.sorted_children();
        let (key, value) = match children.as_slice() {
            [key, value] if member.s_type == JSON_MEMBER && key.s_type == JSON_KEY => (*key, *value),
            _ => {
                return Err(OracleError::structural(
                    &member.uuid,
                    "JSON object member must hold a key terminal and a value",
                ));
            }
        };
        let Some(key) = self.leaf(key, "JSON member key")?.text() else {
            return Ok(None);
        };
        let key = key.to_string();
        Ok(self.json_node(value)?.map(|v| (key, v)))
    }
}

/// Turn leaf text into a JSON value of the leaf's declared kind.
fn json_leaf(node: &Node, kind: &str, text: &str, replaced: bool) -> Result<Value, OracleError> {
    let source = if replaced { "replacement" } else { "value" };
    let mismatch = |expected: &str| {
        OracleError::structural(
            &node.uuid,
            format!("{} '{}' is not a valid {} for {}", source, text, expected, kind),
        )
    };

    match kind {
        JSON_STRING => Ok(Value::String(text.to_string())),
        JSON_INT => text
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| mismatch("integer")),
        JSON_REAL => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| mismatch("finite number")),
        JSON_BOOL => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(mismatch("boolean")),
        },
        // A forged value for a null slot keeps its text.
        JSON_NULL if replaced => Ok(Value::String(text.to_string())),
        JSON_NULL => Ok(Value::Null),
        other => Err(OracleError::structural(
            &node.uuid,
            format!("unrecognized JSON leaf '{}'", other),
        )),
    }
}
