use std::collections::BTreeMap;
use super::Reconstructor;
use crate::errors::OracleError;
use crate::models::Node;

impl Reconstructor<'_> {
    /// Rebuild a `Cookie` header value, pairs sorted by name.
    pub fn cookie_header(&mut self, tree: &Node) -> Result<String, OracleError> {
        let mut jar: BTreeMap<String, String> = BTreeMap::new();
        for pair in tree.sorted_children() {
            let (name, value) = self.pair_terminals(pair, "cookie pair")?;
            let Some(name) = self.leaf(name, "cookie name")?.text() else {
                continue;
            };
            let Some(value) = self.leaf(value, "cookie value")?.text() else {
                continue;
            };
            jar.insert(name.to_string(), value.to_string());
        }

        Ok(jar
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; "))
    }
}
