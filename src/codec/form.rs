use indexmap::IndexMap;
use url::form_urlencoded;
use super::Reconstructor;
use crate::errors::OracleError;
use crate::models::Node;

pub const PARAM_NAME: &str = "param-name";
pub const PARAM_VALUE: &str = "param-value";

/// Parameter name to ordered values. Keys keep first-appearance order.
pub type ParamMultimap = IndexMap<String, Vec<String>>;

/// Encode as `application/x-www-form-urlencoded`, grouping repeated keys.
/// A key with an empty value list contributes nothing.
pub fn encode_params(params: &ParamMultimap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, values) in params {
        for value in values {
            serializer.append_pair(name, value);
        }
    }
    serializer.finish()
}

impl Reconstructor<'_> {
    pub fn query_string(&mut self, tree: &Node) -> Result<String, OracleError> {
        let params = self.query_params(tree)?;
        Ok(encode_params(&params))
    }

    /// Walk alternating name/value terminals of a query string.
    pub fn query_params(&mut self, tree: &Node) -> Result<ParamMultimap, OracleError> {
        let mut params = ParamMultimap::new();
        // Name waiting for its value.
        let mut pending: Option<String> = None;
        // The last name was suppressed, so its value is skipped too.
        let mut dropped = false;

        for child in tree.sorted_children() {
            match child.s_type.as_str() {
                PARAM_NAME => {
                    if let Some(name) = pending.take() {
                        params.entry(name).or_default().push(String::new());
                    }
                    dropped = false;
                    match self.leaf(child, "query-string parameter name")?.text() {
                        Some(name) => pending = Some(name.to_string()),
                        None => dropped = true,
                    }
                }
                PARAM_VALUE => {
                    if dropped {
                        dropped = false;
                        continue;
                    }
                    let Some(name) = pending.take() else {
                        self.anomaly(child, "query-string value without a preceding name, skipped");
                        continue;
                    };
                    // A suppressed value takes its name off the wire as well.
                    if let Some(value) = self.leaf(child, "query-string parameter value")?.text() {
                        params.entry(name).or_default().push(value.to_string());
                    }
                }
                other => {
                    return Err(OracleError::structural(
                        &child.uuid,
                        format!("unexpected '{}' node in query string", other),
                    ));
                }
            }
        }

        if let Some(name) = pending {
            params.entry(name).or_default().push(String::new());
        }
        Ok(params)
    }

    pub fn form_urlencoded(&mut self, tree: &Node) -> Result<String, OracleError> {
        let params = self.form_params(tree)?;
        Ok(encode_params(&params))
    }

    /// Form bodies are stored as one pair nonterminal per field. A suppressed
    /// value leaves the name with an empty value list.
    pub fn form_params(&mut self, tree: &Node) -> Result<ParamMultimap, OracleError> {
        let mut params = ParamMultimap::new();
        for pair in tree.sorted_children() {
            let (name, value) = self.pair_terminals(pair, "form-urlencoded pair")?;
            let Some(name) = self.leaf(name, "form-urlencoded name")?.text() else {
                continue;
            };
            let value = self.leaf(value, "form-urlencoded value")?.text();
            let entry = params.entry(name.to_string()).or_default();
            if let Some(value) = value {
                entry.push(value.to_string());
            }
        }
        Ok(params)
    }
}
