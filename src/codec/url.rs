use super::Reconstructor;
use crate::errors::OracleError;
use crate::models::{Node, NodeKind};

/// Schemes whose URLs carry an authority even when the netloc is empty.
const USES_NETLOC: &[&str] = &[
    "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https", "shttp",
    "snews", "prospero", "rtsp", "rtspu", "rsync", "svn", "svn+ssh", "sftp", "nfs", "git",
    "git+ssh", "ws", "wss",
];

/// Join URL components back into a URL string.
pub fn unparse(scheme: &str, netloc: &str, path: &str, query: &str) -> String {
    let mut url = path.to_string();
    let needs_authority = !netloc.is_empty()
        || (!scheme.is_empty() && USES_NETLOC.contains(&scheme) && !url.starts_with("//"));
    if needs_authority {
        if !url.is_empty() && !url.starts_with('/') {
            url.insert(0, '/');
        }
        url = format!("//{}{}", netloc, url);
    }
    if !scheme.is_empty() {
        url = format!("{}:{}", scheme, url);
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    url
}

impl Reconstructor<'_> {
    pub fn url(&mut self, tree: &Node) -> Result<String, OracleError> {
        let mut scheme = String::new();
        let mut netloc = String::new();
        let mut path = String::new();
        let mut query = String::new();

        for child in tree.sorted_children() {
            match (&child.kind, child.s_type.as_str()) {
                (NodeKind::Terminal { .. }, "scheme") => {
                    scheme = self.leaf(child, "URL scheme")?.text().unwrap_or("").to_string();
                }
                (NodeKind::Terminal { .. }, "netloc") => {
                    netloc = self.leaf(child, "URL netloc")?.text().unwrap_or("").to_string();
                }
                (NodeKind::Terminal { .. }, "path") => {
                    path = self.leaf(child, "URL path")?.text().unwrap_or("").to_string();
                }
                (NodeKind::NonTerminal { .. }, "query-string") => {
                    query = self.query_string(child)?;
                }
                (_, other) => {
                    return Err(OracleError::structural(
                        &child.uuid,
                        format!("unrecognized URL component '{}'", other),
                    ));
                }
            }
        }

        Ok(unparse(&scheme, &netloc, &path, &query))
    }
}
